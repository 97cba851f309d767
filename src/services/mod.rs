//! Request handling logic.
//!
//! Every operation returns an [`AppResult<Page>`](crate::views::Page): either
//! a view to render or a location to redirect to.

pub mod authors;
pub mod books;
pub mod catalog;
pub mod genres;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository),
        }
    }
}
