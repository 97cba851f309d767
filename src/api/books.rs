//! Book endpoints

use axum::{
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::Form;

use crate::{
    forms::book::{BookDeleteInput, BookInput},
    AppState,
};

pub async fn book_list(State(state): State<AppState>) -> Response {
    state.views.respond(state.services.books.list().await)
}

pub async fn book_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.books.detail(&id).await)
}

pub async fn book_create_get(State(state): State<AppState>) -> Response {
    state.views.respond(state.services.books.create_form().await)
}

/// `genre` may repeat, one value per ticked checkbox
pub async fn book_create_post(
    State(state): State<AppState>,
    Form(input): Form<BookInput>,
) -> Response {
    state.views.respond(state.services.books.create(&input).await)
}

pub async fn book_update_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.books.update_form(&id).await)
}

pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<BookInput>,
) -> Response {
    state.views.respond(state.services.books.update(&id, &input).await)
}

pub async fn book_delete_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.books.delete_form(&id).await)
}

pub async fn book_delete_post(
    State(state): State<AppState>,
    Form(input): Form<BookDeleteInput>,
) -> Response {
    state.views.respond(state.services.books.delete(&input).await)
}
