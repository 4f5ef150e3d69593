//! Request validation for book payloads.
//!
//! The same rule set runs in two strengths: create and replace require every
//! field, partial updates only check the fields that are present.

use bookshelf_http::error::FieldErrors;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::models::{BookField, BookPatch, NewBook};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Replace,
    Partial,
}

impl Mode {
    const fn requires_all(self) -> bool {
        matches!(self, Mode::Create | Mode::Replace)
    }
}

/// Check `input` against the rules for `mode` and return the normalized fields.
pub fn validate(input: &Value, mode: Mode) -> Result<BookPatch, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Some(object) = input.as_object() else {
        errors.add("body", "The request body must be a JSON object.");
        return Err(errors);
    };

    let mut patch = BookPatch::default();
    for field in BookField::ALL {
        let name = field.wire_name();
        let text = match object.get(name) {
            None if !mode.requires_all() => continue,
            None | Some(Value::Null) => {
                errors.add(name, required_message(field));
                continue;
            }
            Some(Value::String(text)) if text.trim().is_empty() => {
                errors.add(name, required_message(field));
                continue;
            }
            Some(Value::String(text)) => text,
            Some(_) => {
                errors.add(name, format!("The {name} field must be a string."));
                continue;
            }
        };

        match field {
            BookField::Title => patch.title = Some(text.clone()),
            BookField::Author => patch.author = Some(text.clone()),
            BookField::Genre => patch.genre = Some(text.clone()),
            BookField::Description => patch.description = Some(text.clone()),
            BookField::PublishedDate => match parse_date(text) {
                Some(date) => patch.published_date = Some(date),
                None => errors.add(name, format!("The {name} field must be a valid date.")),
            },
        }
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

/// Validate a create or replace payload into a complete record.
pub fn validate_new(input: &Value, mode: Mode) -> Result<NewBook, FieldErrors> {
    let patch = validate(input, mode)?;
    match patch {
        BookPatch {
            title: Some(title),
            author: Some(author),
            genre: Some(genre),
            description: Some(description),
            published_date: Some(published_date),
        } => Ok(NewBook {
            title,
            author,
            genre,
            description,
            published_date,
        }),
        incomplete => {
            let mut errors = FieldErrors::new();
            for field in incomplete.missing() {
                errors.add(field.wire_name(), required_message(field));
            }
            Err(errors)
        }
    }
}

fn required_message(field: BookField) -> String {
    format!("The {} field is required.", field.wire_name())
}

/// Parse the date spellings clients send. Any time-of-day part is dropped; an
/// offset-qualified timestamp keeps the calendar date as written.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Value {
        json!({
            "title": "Dune",
            "author": "Herbert",
            "genre": "Sci-Fi",
            "description": "Desert planet",
            "publishedDate": "1965-08-01"
        })
    }

    #[test]
    fn create_accepts_complete_payload() {
        let book = validate_new(&full_payload(), Mode::Create).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(
            book.published_date,
            NaiveDate::from_ymd_opt(1965, 8, 1).unwrap()
        );
    }

    #[test]
    fn replace_reports_every_missing_field() {
        let errors = validate_new(&json!({"title": "Dune"}), Mode::Replace).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["author", "description", "genre", "publishedDate"]
        );
        assert_eq!(
            errors.get("author").unwrap(),
            ["The author field is required.".to_string()]
        );
    }

    #[test]
    fn blank_and_null_count_as_missing() {
        let mut payload = full_payload();
        payload["title"] = json!("   ");
        payload["genre"] = Value::Null;

        let errors = validate_new(&payload, Mode::Create).unwrap_err();
        assert_eq!(
            errors.get("title").unwrap(),
            ["The title field is required.".to_string()]
        );
        assert_eq!(
            errors.get("genre").unwrap(),
            ["The genre field is required.".to_string()]
        );
    }

    #[test]
    fn non_string_values_are_rejected() {
        let mut payload = full_payload();
        payload["author"] = json!(42);

        let errors = validate_new(&payload, Mode::Create).unwrap_err();
        assert_eq!(
            errors.get("author").unwrap(),
            ["The author field must be a string.".to_string()]
        );
    }

    #[test]
    fn invalid_dates_are_rejected() {
        for bad in ["1965-13-01", "yesterday", "1965-02-30"] {
            let mut payload = full_payload();
            payload["publishedDate"] = json!(bad);
            let errors = validate_new(&payload, Mode::Create).unwrap_err();
            assert_eq!(
                errors.get("publishedDate").unwrap(),
                ["The publishedDate field must be a valid date.".to_string()],
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn partial_mode_ignores_absent_fields() {
        let patch = validate(&json!({"genre": "Fantasy"}), Mode::Partial).unwrap();
        assert_eq!(patch.genre.as_deref(), Some("Fantasy"));
        assert!(patch.title.is_none());
        assert!(patch.published_date.is_none());
    }

    #[test]
    fn partial_mode_still_checks_present_fields() {
        let errors = validate(&json!({"title": "", "author": null}), Mode::Partial).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get("title").is_some());
        assert!(errors.get("author").is_some());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = validate(&json!(["Dune"]), Mode::Create).unwrap_err();
        assert!(errors.get("body").is_some());
    }

    #[test]
    fn client_supplied_id_and_unknown_keys_are_ignored() {
        let mut payload = full_payload();
        payload["id"] = json!(99);
        payload["rating"] = json!(5);
        assert!(validate_new(&payload, Mode::Create).is_ok());
    }

    #[test]
    fn strings_are_kept_verbatim() {
        let mut payload = full_payload();
        payload["title"] = json!("  Dune  ");
        let book = validate_new(&payload, Mode::Create).unwrap();
        assert_eq!(book.title, "  Dune  ");
    }

    #[test]
    fn dates_drop_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(1965, 8, 1);
        assert_eq!(parse_date("1965-08-01"), expected);
        assert_eq!(parse_date("1965-08-01T00:00:00.000000Z"), expected);
        assert_eq!(parse_date("1965-08-01T23:59:59+05:00"), expected);
        assert_eq!(parse_date("1965-08-01T18:30:00"), expected);
        assert_eq!(parse_date("1965-08-01 18:30:00.250"), expected);
        assert_eq!(parse_date(""), None);
    }
}
