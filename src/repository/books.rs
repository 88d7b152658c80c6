//! Books repository backed by Postgres

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::{ensure_persisted, ensure_valid, BookRepository};
use crate::{
    error::AppResult,
    models::{Book, BookId, BookRow},
};

const SELECT_BOOK: &str =
    r#"SELECT id, title, author, "type", description, created_at, updated_at FROM books"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn into_books(rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        rows.into_iter().map(Book::try_from).collect()
    }
}

#[async_trait]
impl BookRepository for BooksRepository {
    async fn create(&self, book: &mut Book) -> AppResult<()> {
        let book_type = ensure_valid(book)?;

        // Both timestamps default to now(), which is fixed per transaction
        let (id, created_at) = sqlx::query_as::<_, (BookId, DateTime<Utc>)>(
            r#"
            INSERT INTO books (title, author, "type", description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            "#,
        )
        .bind(book.title())
        .bind(book.author())
        .bind(book_type.as_str())
        .bind(book.description())
        .fetch_one(&self.pool)
        .await?;

        book.mark_persisted(id, created_at);
        Ok(())
    }

    async fn find_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOK} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Book::try_from).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{SELECT_BOOK} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Self::into_books(rows)
    }

    async fn update(&self, book: &mut Book) -> AppResult<bool> {
        let id = ensure_persisted(book)?;
        let book_type = ensure_valid(book)?;

        let updated_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            UPDATE books
            SET title = $1, author = $2, "type" = $3, description = $4,
                updated_at = GREATEST(now(), created_at)
            WHERE id = $5
            RETURNING updated_at
            "#,
        )
        .bind(book.title())
        .bind(book.author())
        .bind(book_type.as_str())
        .bind(book.description())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match updated_at {
            Some(ts) => {
                book.mark_updated(ts);
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: BookId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            r"{SELECT_BOOK} WHERE title ILIKE $1 ESCAPE '\' OR author ILIKE $1 ESCAPE '\'
              ORDER BY created_at DESC, id DESC"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Self::into_books(rows)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
