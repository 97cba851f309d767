//! Views: named templates rendered from a JSON context.
//!
//! Services decide *what* to answer with a [`Page`]; [`Views::respond`] is the
//! single place turning pages and errors into HTTP responses.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::{json, Value};
use tera::{Context, Tera};

use crate::error::{AppError, AppResult};

/// Outcome of a request handler
#[derive(Debug, Clone)]
pub enum Page {
    Render(View),
    /// 303 to the given location
    Redirect(String),
}

impl Page {
    pub fn render(name: &'static str, context: Value) -> Self {
        Page::Render(View { name, context })
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Page::Redirect(location.into())
    }
}

#[derive(Debug, Clone)]
pub struct View {
    pub name: &'static str,
    /// JSON object, always carrying at least `title`
    pub context: Value,
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("author_list.html", include_str!("../templates/author_list.html")),
    ("author_detail.html", include_str!("../templates/author_detail.html")),
    ("author_form.html", include_str!("../templates/author_form.html")),
    ("author_delete.html", include_str!("../templates/author_delete.html")),
    ("genre_list.html", include_str!("../templates/genre_list.html")),
    ("genre_detail.html", include_str!("../templates/genre_detail.html")),
    ("genre_form.html", include_str!("../templates/genre_form.html")),
    ("genre_delete.html", include_str!("../templates/genre_delete.html")),
    ("book_list.html", include_str!("../templates/book_list.html")),
    ("book_detail.html", include_str!("../templates/book_detail.html")),
    ("book_form.html", include_str!("../templates/book_form.html")),
    ("book_delete.html", include_str!("../templates/book_delete.html")),
];

/// Template engine shared by all handlers
#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    /// Templates compiled into the binary
    pub fn builtin() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self::from_tera(tera))
    }

    /// Templates loaded from disk, e.g. `templates/**/*.html`
    pub fn from_glob(glob: &str) -> AppResult<Self> {
        let tera = Tera::new(glob)?;
        Ok(Self::from_tera(tera))
    }

    fn from_tera(mut tera: Tera) -> Self {
        // Stored text is escaped when the form is submitted
        tera.autoescape_on(vec![]);
        Self {
            tera: Arc::new(tera),
        }
    }

    pub fn render(&self, view: &View) -> AppResult<String> {
        let context = Context::from_value(view.context.clone())?;
        let html = self.tera.render(&format!("{}.html", view.name), &context)?;
        Ok(html)
    }

    /// Map a handler outcome to a response.
    ///
    /// `NotFound` becomes a 404 error page, any other error a 500 one.
    pub fn respond(&self, outcome: AppResult<Page>) -> Response {
        let result = outcome.and_then(|page| match page {
            Page::Redirect(location) => Ok(Redirect::to(&location).into_response()),
            Page::Render(view) => self.render(&view).map(|html| Html(html).into_response()),
        });
        match result {
            Ok(response) => response,
            Err(err) => self.error_page(err),
        }
    }

    fn error_page(&self, err: AppError) -> Response {
        let status = err.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("{}", err);
        }
        let view = View {
            name: "error",
            context: json!({
                "title": status.canonical_reason().unwrap_or("Error"),
                "message": err.public_message(),
                "status": status.as_u16(),
            }),
        };
        match self.render(&view) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(render_err) => {
                tracing::error!("Failed to render error page: {}", render_err);
                err.into_response()
            }
        }
    }
}
