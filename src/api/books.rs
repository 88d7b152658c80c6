//! Read-only JSON endpoints for the catalog

use axum::{extract::State, Json};

use super::extract::{ApiPath, ApiQuery};
use crate::{
    error::ApiResult,
    models::{parse_book_id, ApiSearchQuery, Book},
};

/// List all books, newest first
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> ApiResult<Json<Vec<Book>>> {
    let books = state.services.books.list_books().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Malformed book ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    ApiPath(raw_id): ApiPath<String>,
) -> ApiResult<Json<Book>> {
    let id = parse_book_id(Some(&raw_id))?;
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book))
}

/// Search books by title or author
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(ApiSearchQuery),
    responses(
        (status = 200, description = "Matching books, newest first", body = Vec<Book>),
        (status = 400, description = "Missing search term", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    ApiQuery(query): ApiQuery<ApiSearchQuery>,
) -> ApiResult<Json<Vec<Book>>> {
    let books = state
        .services
        .books
        .search_books(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(books))
}
