//! In-memory implementation of the entity stores.
//!
//! Useful for testing and development. Each table sits behind its own
//! `RwLock`; every call takes the lock once, so single-record writes are
//! atomic and nothing spans more than one call.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorStore, BookStore, GenreStore};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorData, Book, BookData, BookSummary, Genre, GenreData},
};

#[derive(Default)]
pub struct MemoryStore {
    authors: RwLock<HashMap<Uuid, Author>>,
    genres: RwLock<HashMap<Uuid, Genre>>,
    books: RwLock<HashMap<Uuid, Book>>,
}

fn summarize<'a>(books: impl Iterator<Item = &'a Book>) -> Vec<BookSummary> {
    let mut rows: Vec<BookSummary> = books
        .map(|b| BookSummary {
            id: b.id,
            title: b.title.clone(),
            summary: b.summary.clone(),
        })
        .collect();
    rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    rows
}

fn build_book(id: Uuid, data: &BookData) -> AppResult<Book> {
    let author_id = data
        .author
        .ok_or_else(|| AppError::Validation("Book author is required".to_string()))?;
    Ok(Book {
        id,
        title: data.title.clone(),
        author_id,
        summary: data.summary.clone(),
        isbn: data.isbn.clone(),
        genre_ids: data.genre.clone(),
    })
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let mut rows: Vec<Author> = self.authors.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.family_name.cmp(&b.family_name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.authors.read().await.get(&id).cloned())
    }

    async fn create(&self, data: &AuthorData) -> AppResult<Author> {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: data.first_name.clone(),
            family_name: data.family_name.clone(),
            date_of_birth: data.date_of_birth,
            date_of_death: data.date_of_death,
        };
        self.authors.write().await.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, id: Uuid, data: &AuthorData) -> AppResult<Option<Author>> {
        let mut authors = self.authors.write().await;
        let Some(author) = authors.get_mut(&id) else {
            return Ok(None);
        };
        author.first_name = data.first_name.clone();
        author.family_name = data.family_name.clone();
        author.date_of_birth = data.date_of_birth;
        author.date_of_death = data.date_of_death;
        Ok(Some(author.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.authors.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.authors.read().await.len() as i64)
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let mut rows: Vec<Genre> = self.genres.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.genres.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let wanted = name.to_lowercase();
        let genres = self.genres.read().await;
        let mut matches: Vec<&Genre> = genres
            .values()
            .filter(|g| g.name.to_lowercase() == wanted)
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(matches.first().map(|g| (*g).clone()))
    }

    async fn create(&self, data: &GenreData) -> AppResult<Genre> {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: data.name.clone(),
        };
        self.genres.write().await.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update(&self, id: Uuid, data: &GenreData) -> AppResult<Option<Genre>> {
        let mut genres = self.genres.write().await;
        let Some(genre) = genres.get_mut(&id) else {
            return Ok(None);
        };
        genre.name = data.name.clone();
        Ok(Some(genre.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.genres.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.genres.read().await.len() as i64)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let mut rows: Vec<Book> = self.books.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn by_author(&self, author_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let books = self.books.read().await;
        Ok(summarize(books.values().filter(|b| b.author_id == author_id)))
    }

    async fn by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let books = self.books.read().await;
        Ok(summarize(
            books.values().filter(|b| b.genre_ids.contains(&genre_id)),
        ))
    }

    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let book = build_book(Uuid::new_v4(), data)?;
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>> {
        let updated = build_book(id, data)?;
        let mut books = self.books.write().await;
        let Some(book) = books.get_mut(&id) else {
            return Ok(None);
        };
        *book = updated;
        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.books.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.books.read().await.len() as i64)
    }
}
