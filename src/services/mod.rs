//! Business logic services

pub mod books;
pub mod redis;
pub mod session;

use std::{sync::Arc, time::Duration};

use crate::{
    config::{SessionBackend, SessionConfig},
    error::AppResult,
    repository::BookRepository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
    pub sessions: session::SessionManager,
}

impl Services {
    pub fn new(repository: Arc<dyn BookRepository>, sessions: session::SessionManager) -> Self {
        Self {
            books: books::BookService::new(repository),
            sessions,
        }
    }

    /// Build the session manager for the configured backend
    pub async fn session_manager(config: &SessionConfig) -> AppResult<session::SessionManager> {
        let store: Arc<dyn session::SessionStore> = match config.backend {
            SessionBackend::Memory => Arc::new(session::MemorySessionStore::with_ttl(
                Duration::from_secs(config.notice_ttl_secs),
            )),
            SessionBackend::Redis => Arc::new(
                redis::RedisSessionStore::new(&config.redis_url, config.notice_ttl_secs).await?,
            ),
        };
        Ok(session::SessionManager::new(store, config.cookie_name.clone()))
    }
}
