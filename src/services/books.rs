//! Book pages

use std::collections::HashMap;

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    forms::{
        book::{self, BookDeleteInput, BookInput},
        FieldError,
    },
    models::{parse_id, Author, AuthorView, Book, BookData, BookDetail, Genre, GenreView},
    repository::Repository,
    views::Page,
};

pub const BOOK_LIST_URL: &str = "/catalog/books";

fn not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

/// Genres in the order the book lists them; unknown ids are skipped
fn genres_of(ids: &[Uuid], genres: Vec<Genre>) -> Vec<GenreView> {
    let mut by_id: HashMap<Uuid, Genre> = genres.into_iter().map(|g| (g.id, g)).collect();
    ids.iter()
        .filter_map(|id| by_id.remove(id))
        .map(GenreView::from)
        .collect()
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn resolve(&self, book: Book) -> AppResult<BookDetail> {
        let (author, genres) = tokio::try_join!(
            self.repository.authors.find(book.author_id),
            self.repository.genres.list()
        )?;
        let genres = genres_of(&book.genre_ids, genres);
        Ok(BookDetail::new(book, author.map(AuthorView::from), genres))
    }

    /// Book form with every author and genre to choose from
    async fn form_page(
        &self,
        title: &str,
        book: &BookData,
        errors: &[FieldError],
    ) -> AppResult<Page> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors.list(),
            self.repository.genres.list()
        )?;
        Ok(Self::form_view(title, book, errors, authors, genres))
    }

    fn form_view(
        title: &str,
        book: &BookData,
        errors: &[FieldError],
        authors: Vec<Author>,
        genres: Vec<Genre>,
    ) -> Page {
        let genres: Vec<GenreView> = genres
            .into_iter()
            .map(|genre| {
                let checked = book.genre.contains(&genre.id);
                GenreView {
                    checked,
                    ..GenreView::from(genre)
                }
            })
            .collect();

        let mut context = json!({
            "title": title,
            "authors": authors.into_iter().map(AuthorView::from).collect::<Vec<_>>(),
            "genres": genres,
            "book": book,
        });
        if !errors.is_empty() {
            context["errors"] = json!(errors);
        }
        Page::render("book_form", context)
    }

    pub async fn list(&self) -> AppResult<Page> {
        let (books, authors) = tokio::try_join!(
            self.repository.books.list(),
            self.repository.authors.list()
        )?;
        let authors: HashMap<Uuid, AuthorView> = authors
            .into_iter()
            .map(|a| (a.id, AuthorView::from(a)))
            .collect();
        let book_list: Vec<BookDetail> = books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author_id).cloned();
                BookDetail::new(book, author, Vec::new())
            })
            .collect();

        Ok(Page::render(
            "book_list",
            json!({ "title": "Book List", "book_list": book_list }),
        ))
    }

    pub async fn detail(&self, id: &str) -> AppResult<Page> {
        let id = parse_id(id).ok_or_else(not_found)?;
        let book = self.repository.books.find(id).await?.ok_or_else(not_found)?;
        let detail = self.resolve(book).await?;
        Ok(Page::render(
            "book_detail",
            json!({ "title": detail.title.clone(), "book": detail }),
        ))
    }

    pub async fn create_form(&self) -> AppResult<Page> {
        self.form_page("Create Book", &BookData::default(), &[]).await
    }

    pub async fn create(&self, input: &BookInput) -> AppResult<Page> {
        let validated = book::validate(input);
        if !validated.is_valid() {
            return self
                .form_page("Create Book", &validated.value, &validated.errors)
                .await;
        }

        let book = self.repository.books.create(&validated.value).await?;
        tracing::info!(id = %book.id, "Book created");
        Ok(Page::redirect(book.url()))
    }

    pub async fn update_form(&self, id: &str) -> AppResult<Page> {
        let id = parse_id(id).ok_or_else(not_found)?;
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books.find(id),
            self.repository.authors.list(),
            self.repository.genres.list()
        )?;
        let book = book.ok_or_else(not_found)?;
        Ok(Self::form_view(
            "Update Book",
            &BookData::from(&book),
            &[],
            authors,
            genres,
        ))
    }

    pub async fn update(&self, id: &str, input: &BookInput) -> AppResult<Page> {
        let validated = book::validate(input);
        if !validated.is_valid() {
            return self
                .form_page("Update Book", &validated.value, &validated.errors)
                .await;
        }

        let id = parse_id(id).ok_or_else(not_found)?;
        let book = self
            .repository
            .books
            .update(id, &validated.value)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id = %book.id, "Book updated");
        Ok(Page::redirect(book.url()))
    }

    pub async fn delete_form(&self, id: &str) -> AppResult<Page> {
        let book = match parse_id(id) {
            Some(id) => self.repository.books.find(id).await?,
            None => None,
        };
        let Some(book) = book else {
            return Ok(Page::redirect(BOOK_LIST_URL));
        };
        let detail = self.resolve(book).await?;
        Ok(Page::render(
            "book_delete",
            json!({ "title": "Delete Book", "book": detail }),
        ))
    }

    pub async fn delete(&self, input: &BookDeleteInput) -> AppResult<Page> {
        match input.bookid.as_deref().and_then(parse_id) {
            Some(target) => {
                let removed = self.repository.books.delete(target).await?;
                tracing::info!(id = %target, removed, "Book deleted");
            }
            None => tracing::warn!("Book delete submitted without a valid bookid"),
        }
        Ok(Page::redirect(BOOK_LIST_URL))
    }
}
