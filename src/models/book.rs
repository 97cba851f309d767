//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{author::AuthorView, genre::GenreView};

/// Book record with its author and genre references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub summary: String,
    pub isbn: String,
    /// Genre ids in the order they were submitted
    pub genre_ids: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

pub fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

/// Title and summary of a book, as listed on author and genre pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookSummaryView {
    #[serde(flatten)]
    pub book: BookSummary,
    pub url: String,
}

impl From<BookSummary> for BookSummaryView {
    fn from(book: BookSummary) -> Self {
        Self {
            url: book_url(book.id),
            book,
        }
    }
}

/// Book with its references resolved for display
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    /// `None` when the referenced author no longer exists
    pub author: Option<AuthorView>,
    pub genres: Vec<GenreView>,
}

impl BookDetail {
    pub fn new(book: Book, author: Option<AuthorView>, genres: Vec<GenreView>) -> Self {
        Self {
            url: book.url(),
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            genres,
        }
    }
}

/// Sanitized book fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookData {
    pub title: String,
    /// Missing or malformed ids are reported by the validator
    pub author: Option<Uuid>,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl From<&Book> for BookData {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: Some(book.author_id),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre_ids.clone(),
        }
    }
}
