//! Genre pages

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    forms::genre::{self, GenreDeleteInput, GenreInput},
    models::{parse_id, BookSummary, BookSummaryView, Genre, GenreView},
    repository::Repository,
    views::Page,
};

pub const GENRE_LIST_URL: &str = "/catalog/genres";

fn not_found() -> AppError {
    AppError::NotFound("Genre not found".to_string())
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn with_books(&self, id: Option<Uuid>) -> AppResult<(Option<Genre>, Vec<BookSummary>)> {
        let Some(id) = id else {
            return Ok((None, Vec::new()));
        };
        tokio::try_join!(
            self.repository.genres.find(id),
            self.repository.books.by_genre(id)
        )
    }

    fn delete_page(genre: Genre, books: Vec<BookSummary>) -> Page {
        Page::render(
            "genre_delete",
            json!({
                "title": "Delete Genre",
                "genre": GenreView::from(genre),
                "genre_books": books.into_iter().map(BookSummaryView::from).collect::<Vec<_>>(),
            }),
        )
    }

    pub async fn list(&self) -> AppResult<Page> {
        let genres = self.repository.genres.list().await?;
        Ok(Page::render(
            "genre_list",
            json!({
                "title": "Genre List",
                "genre_list": genres.into_iter().map(GenreView::from).collect::<Vec<_>>(),
            }),
        ))
    }

    pub async fn detail(&self, id: &str) -> AppResult<Page> {
        let (genre, books) = self.with_books(parse_id(id)).await?;
        let genre = genre.ok_or_else(not_found)?;
        Ok(Page::render(
            "genre_detail",
            json!({
                "title": "Genre Detail",
                "genre": GenreView::from(genre),
                "genre_books": books.into_iter().map(BookSummaryView::from).collect::<Vec<_>>(),
            }),
        ))
    }

    pub fn create_form(&self) -> Page {
        Page::render("genre_form", json!({ "title": "Create Genre" }))
    }

    /// Create a genre, or land on the existing one when the name is already
    /// taken (ignoring case).
    pub async fn create(&self, input: &GenreInput) -> AppResult<Page> {
        let validated = genre::validate(input);
        if !validated.is_valid() {
            return Ok(Page::render(
                "genre_form",
                json!({
                    "title": "Create Genre",
                    "genre": validated.value,
                    "errors": validated.errors,
                }),
            ));
        }

        if let Some(existing) = self.repository.genres.find_by_name(&validated.value.name).await? {
            tracing::info!(id = %existing.id, name = %existing.name, "Genre already exists");
            return Ok(Page::redirect(existing.url()));
        }

        let genre = self.repository.genres.create(&validated.value).await?;
        tracing::info!(id = %genre.id, "Genre created");
        Ok(Page::redirect(genre.url()))
    }

    pub async fn update_form(&self, id: &str) -> AppResult<Page> {
        let id = parse_id(id).ok_or_else(not_found)?;
        let genre = self.repository.genres.find(id).await?.ok_or_else(not_found)?;
        Ok(Page::render(
            "genre_form",
            json!({
                "title": "Update Genre",
                "genre": GenreView::from(genre),
            }),
        ))
    }

    pub async fn update(&self, id: &str, input: &GenreInput) -> AppResult<Page> {
        let validated = genre::validate(input);
        if !validated.is_valid() {
            return Ok(Page::render(
                "genre_form",
                json!({
                    "title": "Update Genre",
                    "genre": validated.value,
                    "errors": validated.errors,
                }),
            ));
        }

        let id = parse_id(id).ok_or_else(not_found)?;
        let genre = self
            .repository
            .genres
            .update(id, &validated.value)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id = %genre.id, "Genre updated");
        Ok(Page::redirect(genre.url()))
    }

    pub async fn delete_form(&self, id: &str) -> AppResult<Page> {
        let (genre, books) = self.with_books(parse_id(id)).await?;
        match genre {
            Some(genre) => Ok(Self::delete_page(genre, books)),
            None => Ok(Page::redirect(GENRE_LIST_URL)),
        }
    }

    /// Delete unless books are still tagged with the genre.
    ///
    /// The body `genreid` must name the genre of the path. Not atomic: a
    /// book tagged between the check and the delete keeps a reference to the
    /// removed genre.
    pub async fn delete(&self, id: &str, input: &GenreDeleteInput) -> AppResult<Page> {
        let target = input.genreid.as_deref().and_then(parse_id);
        let Some(target) = target.filter(|target| parse_id(id) == Some(*target)) else {
            tracing::warn!(id, genreid = ?input.genreid, "Genre delete submitted without a matching genreid");
            return Ok(Page::redirect(GENRE_LIST_URL));
        };

        let (genre, books) = self.with_books(Some(target)).await?;
        if !books.is_empty() {
            tracing::info!(id = %target, books = books.len(), "Genre delete refused, books still reference it");
            return Ok(match genre {
                Some(genre) => Self::delete_page(genre, books),
                None => Page::redirect(GENRE_LIST_URL),
            });
        }

        let removed = self.repository.genres.delete(target).await?;
        tracing::info!(id = %target, removed, "Genre deleted");
        Ok(Page::redirect(GENRE_LIST_URL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookData;

    fn named(name: &str) -> GenreInput {
        GenreInput {
            name: Some(name.to_string()),
        }
    }

    fn redirect_of(page: Page) -> String {
        match page {
            Page::Redirect(location) => location,
            Page::Render(view) => panic!("expected a redirect, got view {}", view.name),
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_resolves_to_existing_genre() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());

        let first = redirect_of(service.create(&named("Fiction")).await.unwrap());
        let second = redirect_of(service.create(&named("FICTION")).await.unwrap());
        let third = redirect_of(service.create(&named("  fiction ")).await.unwrap());

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(repository.genres.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_short_name_rerenders_form() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());

        let page = service.create(&named(" ab ")).await.unwrap();
        let Page::Render(view) = page else {
            panic!("expected the form to be rendered again");
        };
        assert_eq!(view.name, "genre_form");
        assert_eq!(view.context["genre"]["name"], "ab");
        assert_eq!(
            view.context["errors"][0]["message"],
            "Genre name must contain at least 3 characters"
        );
        assert_eq!(repository.genres.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_does_not_dedup() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());
        service.create(&named("Poetry")).await.unwrap();
        let location = redirect_of(service.create(&named("Drama")).await.unwrap());
        let drama_id = location.trim_start_matches("/catalog/genre/").to_string();

        let updated = redirect_of(service.update(&drama_id, &named("poetry")).await.unwrap());
        assert_eq!(updated, location);
        assert_eq!(repository.genres.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_form_missing_genre_only_redirects() {
        let service = GenresService::new(Repository::in_memory());
        let page = service.delete_form("missing").await.unwrap();
        assert_eq!(redirect_of(page), GENRE_LIST_URL);
    }

    #[tokio::test]
    async fn test_delete_guard() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());
        let location = redirect_of(service.create(&named("Romance")).await.unwrap());
        let id = location.trim_start_matches("/catalog/genre/").to_string();
        let genre_id = Uuid::parse_str(&id).unwrap();

        let book = repository
            .books
            .create(&BookData {
                title: "Persuasion".to_string(),
                author: Some(Uuid::new_v4()),
                summary: "Second chances.".to_string(),
                isbn: "9780141439686".to_string(),
                genre: vec![genre_id],
            })
            .await
            .unwrap();

        let input = GenreDeleteInput {
            genreid: Some(id.clone()),
        };
        let Page::Render(view) = service.delete(&id, &input).await.unwrap() else {
            panic!("expected the confirmation view");
        };
        assert_eq!(view.name, "genre_delete");
        assert!(repository.genres.find(genre_id).await.unwrap().is_some());

        repository.books.delete(book.id).await.unwrap();
        assert_eq!(redirect_of(service.delete(&id, &input).await.unwrap()), GENRE_LIST_URL);
        assert!(repository.genres.find(genre_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_matching_genreid() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());
        let location = redirect_of(service.create(&named("Romance")).await.unwrap());
        let id = location.trim_start_matches("/catalog/genre/").to_string();
        let genre_id = Uuid::parse_str(&id).unwrap();
        repository
            .books
            .create(&BookData {
                title: "Persuasion".to_string(),
                author: Some(Uuid::new_v4()),
                summary: "Second chances.".to_string(),
                isbn: "9780141439686".to_string(),
                genre: vec![genre_id],
            })
            .await
            .unwrap();

        let input = GenreDeleteInput {
            genreid: Some(id.clone()),
        };
        let other = Uuid::new_v4().to_string();
        for path in ["garbage", other.as_str()] {
            let location = redirect_of(service.delete(path, &input).await.unwrap());
            assert_eq!(location, GENRE_LIST_URL);
        }
        assert!(repository.genres.find(genre_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_short_name_keeps_stored_genre() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());
        let location = redirect_of(service.create(&named("Poetry")).await.unwrap());
        let id = location.trim_start_matches("/catalog/genre/").to_string();
        let genre_id = Uuid::parse_str(&id).unwrap();

        for short in ["", "   ", " ab "] {
            let Page::Render(view) = service.update(&id, &named(short)).await.unwrap() else {
                panic!("expected the form to be rendered again");
            };
            assert_eq!(view.name, "genre_form");
            assert_eq!(view.context["title"], "Update Genre");
            assert_eq!(
                view.context["errors"][0]["message"],
                "Genre name must contain at least 3 characters"
            );
        }

        let stored = repository.genres.find(genre_id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Poetry");
        assert_eq!(repository.genres.count().await.unwrap(), 1);
    }
}
