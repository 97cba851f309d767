//! Genre form fields

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::{FieldRules, Validated};
use crate::models::GenreData;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenreInput {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenreDeleteInput {
    pub genreid: Option<String>,
}

static NAME: Lazy<FieldRules> = Lazy::new(|| {
    FieldRules::new("name")
        .trim()
        .min_length(3, "Genre name must contain at least 3 characters")
        .escape()
});

pub fn validate(input: &GenreInput) -> Validated<GenreData> {
    let mut errors = Vec::new();
    let name = NAME.apply(input.name.as_deref(), &mut errors);
    Validated {
        value: GenreData { name },
        errors,
    }
}
