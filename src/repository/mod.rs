//! Repository layer for catalog persistence.
//!
//! Each entity kind has its own store trait. `Repository::new` wires the
//! PostgreSQL implementations, `Repository::in_memory` a process-local one
//! used by tests and database-less development runs.

pub mod authors;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, AuthorData, Book, BookData, BookSummary, Genre, GenreData},
};

#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors, ordered by family name
    async fn list(&self) -> AppResult<Vec<Author>>;

    async fn find(&self, id: Uuid) -> AppResult<Option<Author>>;

    async fn create(&self, data: &AuthorData) -> AppResult<Author>;

    /// Replace the stored fields, keeping the id. `None` if the author is gone.
    async fn update(&self, id: Uuid, data: &AuthorData) -> AppResult<Option<Author>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres, ordered by name
    async fn list(&self) -> AppResult<Vec<Genre>>;

    async fn find(&self, id: Uuid) -> AppResult<Option<Genre>>;

    /// Case-insensitive exact match on the name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;

    async fn create(&self, data: &GenreData) -> AppResult<Genre>;

    async fn update(&self, id: Uuid, data: &GenreData) -> AppResult<Option<Genre>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ordered by title
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn find(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Books written by the author, projected to title and summary
    async fn by_author(&self, author_id: Uuid) -> AppResult<Vec<BookSummary>>;

    /// Books tagged with the genre, projected to title and summary
    async fn by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookSummary>>;

    async fn create(&self, data: &BookData) -> AppResult<Book>;

    async fn update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

/// Entity stores shared by all services
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool)),
        }
    }

    /// Create a repository whose records live in this process only
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            authors: store.clone(),
            genres: store.clone(),
            books: store,
        }
    }
}
