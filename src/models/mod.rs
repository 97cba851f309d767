//! Data models for the catalog

pub mod author;
pub mod book;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorData, AuthorView};
pub use book::{Book, BookData, BookDetail, BookSummary, BookSummaryView};
pub use genre::{Genre, GenreData, GenreView};

use uuid::Uuid;

/// Parse an id taken from a path or a form body.
///
/// Ids that are not UUIDs cannot name a stored record, so they are
/// treated like ids of absent records.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
