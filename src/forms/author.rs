//! Author form fields

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::{optional_date, FieldRules, Validated};
use crate::models::AuthorData;

/// Raw author submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthorInput {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
}

/// Body of the delete confirmation form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthorDeleteInput {
    pub authorid: Option<String>,
}

static FIRST_NAME: Lazy<FieldRules> = Lazy::new(|| {
    FieldRules::new("first_name")
        .trim()
        .min_length(1, "First name must be specified.")
        .escape()
        .alphanumeric("First name has non-alphanumeric characters.")
});

static FAMILY_NAME: Lazy<FieldRules> = Lazy::new(|| {
    FieldRules::new("family_name")
        .trim()
        .min_length(1, "Family name must be specified.")
        .escape()
        .alphanumeric("Family name has non-alphanumeric characters.")
});

pub fn validate(input: &AuthorInput) -> Validated<AuthorData> {
    let mut errors = Vec::new();

    let first_name = FIRST_NAME.apply(input.first_name.as_deref(), &mut errors);
    let family_name = FAMILY_NAME.apply(input.family_name.as_deref(), &mut errors);
    let date_of_birth = optional_date(
        "date_of_birth",
        input.date_of_birth.as_deref(),
        "Invalid date of birth",
        &mut errors,
    );
    let date_of_death = optional_date(
        "date_of_death",
        input.date_of_death.as_deref(),
        "Invalid date of death",
        &mut errors,
    );

    Validated {
        value: AuthorData {
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        },
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input(first: &str, family: &str, dob: &str) -> AuthorInput {
        AuthorInput {
            first_name: Some(first.to_string()),
            family_name: Some(family.to_string()),
            date_of_birth: Some(dob.to_string()),
            date_of_death: None,
        }
    }

    #[test]
    fn test_valid_author() {
        let validated = validate(&input("  Jane ", "Austen", "1775-12-16"));
        assert!(validated.is_valid());
        assert_eq!(validated.value.first_name, "Jane");
        assert_eq!(
            validated.value.date_of_birth,
            NaiveDate::from_ymd_opt(1775, 12, 16)
        );
        assert_eq!(validated.value.date_of_death, None);
    }

    #[test]
    fn test_blank_names_report_both_rules() {
        let validated = validate(&input(" ", "", ""));
        let messages: Vec<_> = validated.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "First name must be specified.",
                "First name has non-alphanumeric characters.",
                "Family name must be specified.",
                "Family name has non-alphanumeric characters.",
            ]
        );
    }

    #[test]
    fn test_non_alphanumeric_name_is_escaped_and_rejected() {
        let validated = validate(&input("<b>Jane</b>", "Austen", ""));
        assert_eq!(validated.value.first_name, "&lt;b&gt;Jane&lt;&#x2F;b&gt;");
        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].field, "first_name");
    }

    #[test]
    fn test_bad_dates_are_collected() {
        let mut raw = input("Jane", "Austen", "not a date");
        raw.date_of_death = Some("1817-02-30".to_string());
        let validated = validate(&raw);
        let fields: Vec<_> = validated.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["date_of_birth", "date_of_death"]);
    }
}
