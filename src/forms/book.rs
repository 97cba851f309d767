//! Book form fields

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::{escape, FieldError, FieldRules, Validated};
use crate::models::{parse_id, BookData};

/// Raw book submission. `genre` repeats once per ticked checkbox.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub genre: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookDeleteInput {
    pub bookid: Option<String>,
}

static TITLE: Lazy<FieldRules> = Lazy::new(|| {
    FieldRules::new("title")
        .trim()
        .min_length(1, "Title must not be empty.")
        .escape()
});

static AUTHOR: Lazy<FieldRules> = Lazy::new(|| {
    FieldRules::new("author")
        .trim()
        .min_length(1, "Author must not be empty.")
        .escape()
});

static SUMMARY: Lazy<FieldRules> = Lazy::new(|| {
    FieldRules::new("summary")
        .trim()
        .min_length(1, "Summary must not be empty.")
        .escape()
});

static ISBN: Lazy<FieldRules> = Lazy::new(|| {
    FieldRules::new("isbn")
        .trim()
        .min_length(1, "ISBN must not be empty.")
        .escape()
});

pub fn validate(input: &BookInput) -> Validated<BookData> {
    let mut errors = Vec::new();

    let title = TITLE.apply(input.title.as_deref(), &mut errors);
    let author_raw = AUTHOR.apply(input.author.as_deref(), &mut errors);
    let author = parse_id(&author_raw);
    if author.is_none() && !author_raw.is_empty() {
        errors.push(FieldError::new("author", "Author is invalid."));
    }
    let summary = SUMMARY.apply(input.summary.as_deref(), &mut errors);
    let isbn = ISBN.apply(input.isbn.as_deref(), &mut errors);

    // Unknown genre values cannot match a checkbox, drop them
    let mut genre = Vec::new();
    for id in input.genre.iter().filter_map(|raw| parse_id(&escape(raw))) {
        if !genre.contains(&id) {
            genre.push(id);
        }
    }

    Validated {
        value: BookData {
            title,
            author,
            summary,
            isbn,
            genre,
        },
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_valid_book() {
        let author = Uuid::new_v4();
        let fiction = Uuid::new_v4();
        let validated = validate(&BookInput {
            title: Some(" Emma ".to_string()),
            author: Some(author.to_string()),
            summary: Some("Matchmaking goes wrong.".to_string()),
            isbn: Some("9780141439587".to_string()),
            genre: vec![fiction.to_string(), "bogus".to_string(), fiction.to_string()],
        });
        assert!(validated.is_valid(), "{:?}", validated.errors);
        assert_eq!(validated.value.title, "Emma");
        assert_eq!(validated.value.author, Some(author));
        assert_eq!(validated.value.summary, "Matchmaking goes wrong.");
        assert_eq!(validated.value.genre, vec![fiction]);
    }

    #[test]
    fn test_empty_book_reports_every_field() {
        let validated = validate(&BookInput::default());
        let fields: Vec<_> = validated.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "author", "summary", "isbn"]);
        assert_eq!(validated.value.author, None);
    }

    #[test]
    fn test_malformed_author_id() {
        let validated = validate(&BookInput {
            title: Some("Emma".to_string()),
            author: Some("not-an-id".to_string()),
            summary: Some("s".to_string()),
            isbn: Some("i".to_string()),
            genre: vec![],
        });
        assert_eq!(
            validated.errors,
            vec![FieldError::new("author", "Author is invalid.")]
        );
    }
}
