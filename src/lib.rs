//! Bookshelf Book Catalog
//!
//! A small catalog server: books are listed, created, edited, deleted and
//! searched through server-rendered HTML pages, with a read-only JSON API
//! alongside.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod view;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
