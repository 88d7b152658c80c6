//! Repository layer for database operations

pub mod books;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{Book, BookId, BookType},
};

pub use books::BooksRepository;
pub use memory::InMemoryBooksRepository;

/// Handle on the relational store.
///
/// Built once at startup and handed to repositories; failure to connect is
/// returned to the caller, which treats it as fatal.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Storage(e.into()))
    }

    pub fn connection(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// Close every pooled connection; later queries fail
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Persistence contract for books.
///
/// Implementations issue one statement per call and never retry. Absence is
/// reported through `Option` / `bool`, never as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a valid book and write the assigned id and timestamps back onto it
    async fn create(&self, book: &mut Book) -> AppResult<()>;

    async fn find_by_id(&self, id: BookId) -> AppResult<Option<Book>>;

    /// All books, newest first
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    /// Overwrite every mutable field and refresh `updated_at`.
    /// Returns `false` when no row carries the book's id.
    async fn update(&self, book: &mut Book) -> AppResult<bool>;

    /// Returns `false` when no row was removed
    async fn delete(&self, id: BookId) -> AppResult<bool>;

    /// Case-insensitive substring match on title or author, newest first
    async fn search(&self, term: &str) -> AppResult<Vec<Book>>;

    async fn exists(&self, id: BookId) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Round trip to the store, for readiness probes
    async fn ping(&self) -> AppResult<()>;
}

/// Type of a book that passed validation; the only gate before a write
pub(crate) fn ensure_valid(book: &Book) -> AppResult<BookType> {
    match book.book_type() {
        Some(book_type) if book.is_valid() => Ok(book_type),
        _ => Err(AppError::Validation("Invalid book data".into())),
    }
}

/// Id of a book about to be updated
pub(crate) fn ensure_persisted(book: &Book) -> AppResult<BookId> {
    book.id()
        .ok_or_else(|| AppError::Validation("Book ID is required for update".into()))
}
