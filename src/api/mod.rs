//! HTTP surface: HTML pages, the JSON API and its documentation

pub mod books;
pub mod extract;
pub mod health;
pub mod openapi;
pub mod pages;

use axum::{response::Redirect, routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{view::LIST_PATH, AppState};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let html = Router::new()
        .route("/", get(|| async { Redirect::to(LIST_PATH) }))
        .route("/books", get(pages::list_books))
        .route("/books/view", get(pages::show_book))
        .route("/books/create", get(pages::create_form).post(pages::create_book))
        .route("/books/edit", get(pages::edit_form))
        .route("/books/update", get(pages::update_book).post(pages::update_book))
        .route("/books/delete", get(pages::delete_book).post(pages::delete_book))
        .route("/books/search", get(pages::search_books))
        .with_state(state.clone());

    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/books", get(books::list_books))
        .route("/books/search", get(books::search_books))
        .route("/books/:id", get(books::get_book))
        .with_state(state);

    Router::new()
        .merge(html)
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
