//! Process-local books repository, used by tests and by the HTTP layer when
//! no database is wanted.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ensure_persisted, ensure_valid, BookRepository};
use crate::{
    error::AppResult,
    models::{Book, BookId},
};

#[derive(Default)]
struct Table {
    next_id: BookId,
    rows: Vec<Book>,
}

#[derive(Default)]
pub struct InMemoryBooksRepository {
    table: RwLock<Table>,
}

impl InMemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; ids break ties between equal timestamps
fn newest_first(books: &mut [Book]) {
    books.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
}

#[async_trait]
impl BookRepository for InMemoryBooksRepository {
    async fn create(&self, book: &mut Book) -> AppResult<()> {
        ensure_valid(book)?;

        let mut table = self.table.write().await;
        table.next_id += 1;
        book.mark_persisted(table.next_id, Utc::now());
        table.rows.push(book.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|b| b.id() == Some(id)).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let mut books = self.table.read().await.rows.clone();
        newest_first(&mut books);
        Ok(books)
    }

    async fn update(&self, book: &mut Book) -> AppResult<bool> {
        let id = ensure_persisted(book)?;
        ensure_valid(book)?;

        let mut table = self.table.write().await;
        let Some(stored) = table.rows.iter_mut().find(|b| b.id() == Some(id)) else {
            return Ok(false);
        };

        let now = Utc::now();
        let updated_at = match stored.created_at() {
            Some(created_at) if created_at > now => created_at,
            _ => now,
        };

        // Identity and creation time always come from the stored row
        let mut next = stored.clone();
        next.set_title(book.title())?;
        next.set_author(book.author())?;
        if let Some(book_type) = book.book_type() {
            next.set_type(book_type.as_str())?;
        }
        next.set_description(book.description());
        next.mark_updated(updated_at);

        *stored = next;
        book.mark_updated(updated_at);
        Ok(true)
    }

    async fn delete(&self, id: BookId) -> AppResult<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|b| b.id() != Some(id));
        Ok(table.rows.len() < before)
    }

    async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let needle = term.to_lowercase();
        let table = self.table.read().await;
        let mut books: Vec<Book> = table
            .rows
            .iter()
            .filter(|b| {
                b.title().to_lowercase().contains(&needle)
                    || b.author().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        newest_first(&mut books);
        Ok(books)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
