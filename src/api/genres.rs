//! Genre endpoints

use axum::{
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::Form;

use crate::{
    forms::genre::{GenreDeleteInput, GenreInput},
    AppState,
};

pub async fn genre_list(State(state): State<AppState>) -> Response {
    state.views.respond(state.services.genres.list().await)
}

pub async fn genre_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.genres.detail(&id).await)
}

pub async fn genre_create_get(State(state): State<AppState>) -> Response {
    state.views.respond(Ok(state.services.genres.create_form()))
}

/// Create a genre, or redirect to the one already using the name
pub async fn genre_create_post(
    State(state): State<AppState>,
    Form(input): Form<GenreInput>,
) -> Response {
    state.views.respond(state.services.genres.create(&input).await)
}

pub async fn genre_update_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.genres.update_form(&id).await)
}

pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<GenreInput>,
) -> Response {
    state.views.respond(state.services.genres.update(&id, &input).await)
}

pub async fn genre_delete_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.views.respond(state.services.genres.delete_form(&id).await)
}

pub async fn genre_delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<GenreDeleteInput>,
) -> Response {
    state.views.respond(state.services.genres.delete(&id, &input).await)
}
