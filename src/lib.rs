//! Catalog Server
//!
//! A small library catalog (authors, genres, books) served as HTML pages
//! with create/update/delete form flows.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod repository;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub views: views::Views,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> AppResult<Self> {
        let views = match config.views.templates.as_deref() {
            Some(glob) => views::Views::from_glob(glob)?,
            None => views::Views::builtin()?,
        };
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            views,
        })
    }
}
