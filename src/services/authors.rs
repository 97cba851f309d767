//! Author pages

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    forms::author::{self, AuthorDeleteInput, AuthorInput},
    models::{parse_id, Author, AuthorView, BookSummary, BookSummaryView},
    repository::Repository,
    views::Page,
};

pub const AUTHOR_LIST_URL: &str = "/catalog/authors";

fn not_found() -> AppError {
    AppError::NotFound("Author not found".to_string())
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Author and the books referencing it, read concurrently
    async fn with_books(&self, id: Option<Uuid>) -> AppResult<(Option<Author>, Vec<BookSummary>)> {
        let Some(id) = id else {
            return Ok((None, Vec::new()));
        };
        tokio::try_join!(
            self.repository.authors.find(id),
            self.repository.books.by_author(id)
        )
    }

    fn delete_page(author: Author, books: Vec<BookSummary>) -> Page {
        Page::render(
            "author_delete",
            json!({
                "title": "Delete Author",
                "author": AuthorView::from(author),
                "author_books": books.into_iter().map(BookSummaryView::from).collect::<Vec<_>>(),
            }),
        )
    }

    pub async fn list(&self) -> AppResult<Page> {
        let authors = self.repository.authors.list().await?;
        Ok(Page::render(
            "author_list",
            json!({
                "title": "Author List",
                "author_list": authors.into_iter().map(AuthorView::from).collect::<Vec<_>>(),
            }),
        ))
    }

    pub async fn detail(&self, id: &str) -> AppResult<Page> {
        let (author, books) = self.with_books(parse_id(id)).await?;
        let author = author.ok_or_else(not_found)?;
        Ok(Page::render(
            "author_detail",
            json!({
                "title": "Author Detail",
                "author": AuthorView::from(author),
                "author_books": books.into_iter().map(BookSummaryView::from).collect::<Vec<_>>(),
            }),
        ))
    }

    pub fn create_form(&self) -> Page {
        Page::render("author_form", json!({ "title": "Create Author" }))
    }

    pub async fn create(&self, input: &AuthorInput) -> AppResult<Page> {
        let validated = author::validate(input);
        if !validated.is_valid() {
            tracing::debug!(errors = validated.errors.len(), "Author create form rejected");
            return Ok(Page::render(
                "author_form",
                json!({
                    "title": "Create Author",
                    "author": validated.value,
                    "errors": validated.errors,
                }),
            ));
        }

        let author = self.repository.authors.create(&validated.value).await?;
        tracing::info!(id = %author.id, "Author created");
        Ok(Page::redirect(author.url()))
    }

    pub async fn update_form(&self, id: &str) -> AppResult<Page> {
        let id = parse_id(id).ok_or_else(not_found)?;
        let author = self.repository.authors.find(id).await?.ok_or_else(not_found)?;
        Ok(Page::render(
            "author_form",
            json!({
                "title": "Update Author",
                "author": AuthorView::from(author),
            }),
        ))
    }

    pub async fn update(&self, id: &str, input: &AuthorInput) -> AppResult<Page> {
        let validated = author::validate(input);
        if !validated.is_valid() {
            tracing::debug!(errors = validated.errors.len(), "Author update form rejected");
            return Ok(Page::render(
                "author_form",
                json!({
                    "title": "Update Author",
                    "author": validated.value,
                    "errors": validated.errors,
                }),
            ));
        }

        let id = parse_id(id).ok_or_else(not_found)?;
        let author = self
            .repository
            .authors
            .update(id, &validated.value)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id = %author.id, "Author updated");
        Ok(Page::redirect(author.url()))
    }

    pub async fn delete_form(&self, id: &str) -> AppResult<Page> {
        let (author, books) = self.with_books(parse_id(id)).await?;
        match author {
            Some(author) => Ok(Self::delete_page(author, books)),
            None => Ok(Page::redirect(AUTHOR_LIST_URL)),
        }
    }

    /// Delete unless books still reference the author.
    ///
    /// The body `authorid` must name the author of the path. The reference
    /// check and the delete are two separate store calls: a book created in
    /// between is left pointing at a missing author.
    pub async fn delete(&self, id: &str, input: &AuthorDeleteInput) -> AppResult<Page> {
        let target = input.authorid.as_deref().and_then(parse_id);
        let Some(target) = target.filter(|target| parse_id(id) == Some(*target)) else {
            tracing::warn!(id, authorid = ?input.authorid, "Author delete submitted without a matching authorid");
            return Ok(Page::redirect(AUTHOR_LIST_URL));
        };

        let (author, books) = self.with_books(Some(target)).await?;
        if !books.is_empty() {
            tracing::info!(id = %target, books = books.len(), "Author delete refused, books still reference it");
            return Ok(match author {
                Some(author) => Self::delete_page(author, books),
                None => Page::redirect(AUTHOR_LIST_URL),
            });
        }

        let removed = self.repository.authors.delete(target).await?;
        tracing::info!(id = %target, removed, "Author deleted");
        Ok(Page::redirect(AUTHOR_LIST_URL))
    }
}
