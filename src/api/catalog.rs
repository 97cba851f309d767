//! Catalog home

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::AppState;

pub async fn home() -> Response {
    Redirect::to("/catalog").into_response()
}

pub async fn index(State(state): State<AppState>) -> Response {
    state.views.respond(state.services.catalog.index().await)
}
