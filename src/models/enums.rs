//! Shared domain enums

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// BookType
// ---------------------------------------------------------------------------

/// Catalog genre of a book. No other value is ever accepted or stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BookType {
    Adventure,
    Crime,
    Fantasy,
    Horror,
}

impl BookType {
    pub const ALL: [BookType; 4] = [
        BookType::Adventure,
        BookType::Crime,
        BookType::Fantasy,
        BookType::Horror,
    ];

    /// Name as stored in the `type` column and posted by forms
    pub fn as_str(&self) -> &'static str {
        match self {
            BookType::Adventure => "Adventure",
            BookType::Crime => "Crime",
            BookType::Fantasy => "Fantasy",
            BookType::Horror => "Horror",
        }
    }
}

impl FromStr for BookType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = BookType::ALL.iter().map(BookType::as_str).collect();
                AppError::Validation(format!(
                    "Invalid book type. Must be one of: {}",
                    names.join(", ")
                ))
            })
    }
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
