//! Catalog page tests

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use catalog_server::{api, repository::Repository, AppConfig, AppState};

fn app() -> (Router, Repository) {
    let repository = Repository::in_memory();
    let state = AppState::new(AppConfig::default(), repository.clone()).expect("Failed to build state");
    (api::router(state), repository)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    send(app, request).await
}

async fn post(app: &Router, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("Failed to build request");
    send(app, request).await
}

/// Status, `Location` header and body text
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, location, String::from_utf8_lossy(&bytes).into_owned())
}

fn id_from(location: &str) -> String {
    location
        .rsplit('/')
        .next()
        .expect("No id in location")
        .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));
}

#[tokio::test]
async fn test_home_redirects_to_catalog() {
    let (app, _) = app();
    let (status, location, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog"));

    let (status, _, body) = get(&app, "/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Local Library Home"));
}

#[tokio::test]
async fn test_author_create_and_detail() {
    let (app, _) = app();
    let (status, location, _) = post(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen&date_of_birth=1775-12-16",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location.expect("No redirect location");
    assert!(location.starts_with("/catalog/author/"));

    let (status, _, body) = get(&app, &location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Austen, Jane"));
    assert!(body.contains("1775-12-16"));

    let (_, _, body) = get(&app, "/catalog/authors").await;
    assert!(body.contains("Austen, Jane"));
}

#[tokio::test]
async fn test_author_invalid_form_is_rendered_again() {
    let (app, repository) = app();
    let (status, location, body) = post(
        &app,
        "/catalog/author/create",
        "first_name=++&family_name=Austen&date_of_birth=someday",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("First name must be specified."));
    assert!(body.contains("Invalid date of birth"));
    assert!(body.contains("value=\"Austen\""));
    assert_eq!(repository.authors.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_author_update_is_404() {
    let (app, _) = app();
    let (status, _, body) = get(
        &app,
        "/catalog/author/6f1c1d3e-8a2b-4c57-9d0e-2f9b1a7c4e10/update",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Author not found"));
    assert!(!body.contains("<form"));

    let (status, _, _) = get(&app, "/catalog/author/garbage/update").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_delete_guard() {
    let (app, repository) = app();
    let (_, location, _) = post(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen",
    )
    .await;
    let author_id = id_from(&location.expect("No redirect location"));

    let (_, location, _) = post(
        &app,
        "/catalog/book/create",
        &format!("title=Emma&author={}&summary=Matchmaking&isbn=9780141439587", author_id),
    )
    .await;
    let book_id = id_from(&location.expect("No redirect location"));

    let delete_uri = format!("/catalog/author/{}/delete", author_id);
    let form = format!("authorid={}", author_id);

    let (status, location, body) = post(&app, &delete_uri, &form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("Delete the following books"));
    assert_eq!(repository.authors.count().await.unwrap(), 1);

    let (_, _, _) = post(
        &app,
        &format!("/catalog/book/{}/delete", book_id),
        &format!("bookid={}", book_id),
    )
    .await;

    let (status, location, _) = post(&app, &delete_uri, &form).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/authors"));

    let (status, _, _) = get(&app, &format!("/catalog/author/{}", author_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_author_delete_page_redirects() {
    let (app, _) = app();
    let (status, location, _) = get(
        &app,
        "/catalog/author/6f1c1d3e-8a2b-4c57-9d0e-2f9b1a7c4e10/delete",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/authors"));
}

#[tokio::test]
async fn test_genre_duplicate_is_not_created() {
    let (app, repository) = app();
    let (_, first, _) = post(&app, "/catalog/genre/create", "name=Fiction").await;
    let (status, second, _) = post(&app, "/catalog/genre/create", "name=FICTION").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(repository.genres.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_genre_short_name() {
    let (app, repository) = app();
    let (status, _, body) = post(&app, "/catalog/genre/create", "name=+ab+").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Genre name must contain at least 3 characters"));
    assert_eq!(repository.genres.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_genre_delete_page_only_redirects() {
    let (app, _) = app();
    let (status, location, body) = get(&app, "/catalog/genre/nope/delete").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/genres"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_book_with_genres() {
    let (app, _) = app();
    let (_, location, _) = post(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen",
    )
    .await;
    let author_id = id_from(&location.expect("No redirect location"));
    let (_, location, _) = post(&app, "/catalog/genre/create", "name=Romance").await;
    let romance = id_from(&location.expect("No redirect location"));
    let (_, location, _) = post(&app, "/catalog/genre/create", "name=Satire").await;
    let satire = id_from(&location.expect("No redirect location"));

    let (status, location, _) = post(
        &app,
        "/catalog/book/create",
        &format!(
            "title=Emma&author={}&summary=Matchmaking&isbn=9780141439587&genre={}&genre={}",
            author_id, romance, satire
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (status, _, body) = get(&app, &location.expect("No redirect location")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Romance"));
    assert!(body.contains("Satire"));
    assert!(body.contains("Austen, Jane"));

    let (_, _, body) = get(&app, &format!("/catalog/genre/{}", romance)).await;
    assert!(body.contains("Emma"));
}

#[tokio::test]
async fn test_author_delete_with_mismatched_path_keeps_author() {
    let (app, repository) = app();
    let (_, location, _) = post(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen",
    )
    .await;
    let author_id = id_from(&location.expect("No redirect location"));
    post(
        &app,
        "/catalog/book/create",
        &format!("title=Emma&author={}&summary=Matchmaking&isbn=9780141439587", author_id),
    )
    .await;

    let (status, location, _) = post(
        &app,
        "/catalog/author/garbage/delete",
        &format!("authorid={}", author_id),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/authors"));
    assert_eq!(repository.authors.count().await.unwrap(), 1);
    assert_eq!(repository.books.count().await.unwrap(), 1);
}
