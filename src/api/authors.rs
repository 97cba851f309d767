//! Author endpoints

use axum::{
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::Form;

use crate::{
    forms::author::{AuthorDeleteInput, AuthorInput},
    AppState,
};

/// List all authors
pub async fn author_list(State(state): State<AppState>) -> Response {
    state.views.respond(state.services.authors.list().await)
}

/// Author with their books
pub async fn author_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.authors.detail(&id).await)
}

pub async fn author_create_get(State(state): State<AppState>) -> Response {
    state.views.respond(Ok(state.services.authors.create_form()))
}

pub async fn author_create_post(
    State(state): State<AppState>,
    Form(input): Form<AuthorInput>,
) -> Response {
    state.views.respond(state.services.authors.create(&input).await)
}

pub async fn author_update_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.authors.update_form(&id).await)
}

pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<AuthorInput>,
) -> Response {
    state.views.respond(state.services.authors.update(&id, &input).await)
}

pub async fn author_delete_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.authors.delete_form(&id).await)
}

/// Delete an author, refused while books reference them
pub async fn author_delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<AuthorDeleteInput>,
) -> Response {
    state.views.respond(state.services.authors.delete(&id, &input).await)
}
