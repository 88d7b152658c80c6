//! Book model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::BookType;
use crate::error::{AppError, AppResult};

/// Server-assigned book identifier
pub type BookId = i32;

/// Longest accepted title or author, in characters, after trimming
pub const MAX_TEXT_LEN: usize = 255;

/// One catalog record.
///
/// Fields are only reachable through validating setters, so a `Book` never
/// holds a title, author or type that its validators reject. A fresh book is
/// not yet valid: title and author are empty and no type is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Book {
    #[schema(value_type = Option<i32>)]
    id: Option<BookId>,
    title: String,
    author: String,
    #[serde(rename = "type")]
    book_type: Option<BookType>,
    description: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some` once the book has been persisted
    pub fn id(&self) -> Option<BookId> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn book_type(&self) -> Option<BookType> {
        self.book_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn set_title(&mut self, title: &str) -> AppResult<()> {
        self.title = validate_text(title)
            .ok_or_else(|| AppError::Validation("Title must be between 1 and 255 characters".into()))?;
        Ok(())
    }

    pub fn set_author(&mut self, author: &str) -> AppResult<()> {
        self.author = validate_text(author)
            .ok_or_else(|| AppError::Validation("Author must be between 1 and 255 characters".into()))?;
        Ok(())
    }

    /// Leaves the current type untouched when `value` is not a known type.
    pub fn set_type(&mut self, value: &str) -> AppResult<()> {
        self.book_type = Some(value.parse()?);
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
    }

    pub fn is_valid(&self) -> bool {
        validate_text(&self.title).is_some()
            && validate_text(&self.author).is_some()
            && self.book_type.is_some()
    }

    /// Record the identity the store assigned on insert
    pub(crate) fn mark_persisted(&mut self, id: BookId, created_at: DateTime<Utc>) {
        self.id = Some(id);
        self.created_at = Some(created_at);
        self.updated_at = Some(created_at);
    }

    pub(crate) fn mark_updated(&mut self, updated_at: DateTime<Utc>) {
        self.updated_at = Some(updated_at);
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let book_type = self.book_type.map(|t| t.as_str()).unwrap_or("");
        write!(f, "Book: {} by {} ({})", self.title, self.author, book_type)
    }
}

/// Trimmed value if it is non-empty and within [`MAX_TEXT_LEN`]
fn validate_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_TEXT_LEN {
        return None;
    }
    Some(trimmed.to_string())
}

/// Parse a raw identifier parameter. Anything but a positive integer is rejected.
pub fn parse_book_id(raw: Option<&str>) -> AppResult<BookId> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<BookId>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidInput("Valid book ID is required".into()))
}

/// Row shape of the `books` table
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[sqlx(rename = "type")]
    pub book_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookRow> for Book {
    type Error = AppError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let book_type = row.book_type.parse::<BookType>().map_err(|_| {
            AppError::Internal(format!(
                "Book {} has unknown type '{}' in storage",
                row.id, row.book_type
            ))
        })?;

        Ok(Book {
            id: Some(row.id),
            title: row.title,
            author: row.author,
            book_type: Some(book_type),
            description: row.description,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}
