//! Data models for Bookshelf

pub mod book;
pub mod enums;
pub mod params;

// Re-export commonly used types
pub use book::{parse_book_id, Book, BookId, BookRow};
pub use enums::BookType;
pub use params::{ApiSearchQuery, BookForm, IdQuery, RequestMethod, SearchQuery};
