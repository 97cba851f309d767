//! Form sanitization and validation.
//!
//! Every field has an ordered chain of steps. Sanitizers rewrite the value,
//! checks record a [`FieldError`] and let the chain continue, so a single
//! submission reports every failing rule of every field at once.

pub mod author;
pub mod book;
pub mod genre;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{ValidateLength, ValidateRegex};

static ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").unwrap());

const LOCAL_DATE_TIME: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"];

/// A failed rule, tagged with the form field it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Sanitized values together with the failures collected while producing them
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub value: T,
    pub errors: Vec<FieldError>,
}

impl<T> Validated<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Strip leading and trailing whitespace
    Trim,
    /// Replace HTML-unsafe characters with entities
    Escape,
    /// At least `n` characters
    MinLength(u64, &'static str),
    /// ASCII letters and digits only
    Alphanumeric(&'static str),
}

/// Ordered rule chain for one text field
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: &'static str,
    steps: Vec<Step>,
}

impl FieldRules {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            steps: Vec::new(),
        }
    }

    pub fn trim(mut self) -> Self {
        self.steps.push(Step::Trim);
        self
    }

    pub fn escape(mut self) -> Self {
        self.steps.push(Step::Escape);
        self
    }

    pub fn min_length(mut self, min: u64, message: &'static str) -> Self {
        self.steps.push(Step::MinLength(min, message));
        self
    }

    pub fn alphanumeric(mut self, message: &'static str) -> Self {
        self.steps.push(Step::Alphanumeric(message));
        self
    }

    /// Run every step against `raw` (absent counts as empty) and return the
    /// sanitized value. Failures are appended to `errors`.
    pub fn apply(&self, raw: Option<&str>, errors: &mut Vec<FieldError>) -> String {
        let mut value = raw.unwrap_or_default().to_string();
        for step in &self.steps {
            match *step {
                Step::Trim => value = value.trim().to_string(),
                Step::Escape => value = escape(&value),
                Step::MinLength(min, message) => {
                    if !value.validate_length(Some(min), None, None) {
                        errors.push(FieldError::new(self.field, message));
                    }
                }
                Step::Alphanumeric(message) => {
                    if !value.validate_regex(&*ALPHANUMERIC) {
                        errors.push(FieldError::new(self.field, message));
                    }
                }
            }
        }
        value
    }
}

/// Optional calendar date.
///
/// Absent or empty input means "no value". Anything else must be an
/// ISO-8601 date (`YYYY-MM-DD`), a local date-time (`YYYY-MM-DDTHH:MM[:SS]`)
/// or an RFC 3339 date-time. Only the date part is kept.
pub fn optional_date(
    field: &'static str,
    raw: Option<&str>,
    message: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = raw.unwrap_or_default();
    if raw.is_empty() {
        return None;
    }
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            LOCAL_DATE_TIME
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));
    if parsed.is_none() {
        errors.push(FieldError::new(field, message));
    }
    parsed
}

/// HTML-escape user text before it is stored or displayed
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}
