//! Catalog home page

use serde_json::json;

use crate::{error::AppResult, repository::Repository, views::Page};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record counts for the home page
    pub async fn index(&self) -> AppResult<Page> {
        let (book_count, author_count, genre_count) = tokio::try_join!(
            self.repository.books.count(),
            self.repository.authors.count(),
            self.repository.genres.count()
        )?;
        Ok(Page::render(
            "index",
            json!({
                "title": "Local Library Home",
                "book_count": book_count,
                "author_count": author_count,
                "genre_count": genre_count,
            }),
        ))
    }
}
