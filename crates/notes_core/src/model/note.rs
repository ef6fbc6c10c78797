//! Note record and write-payload validation.
//!
//! # Responsibility
//! - Define the persisted `Note` and its JSON shape.
//! - Turn an untyped JSON payload into a `NoteDraft`, or a field-keyed list
//!   of every problem found.
//!
//! # Invariants
//! - Only `id`, `title` and `content` are serialized; timestamps stay internal.
//! - `id` in a write payload is ignored, it is read-only.
//! - Draft fields are trimmed and non-blank; `title` fits `TITLE_MAX_CHARS`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned note identifier.
pub type NoteId = i64;

/// Upper bound on title length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// Key used for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const MSG_REQUIRED: &str = "This field is required.";
const MSG_NULL: &str = "This field may not be null.";
const MSG_BLANK: &str = "This field may not be blank.";
const MSG_NOT_STRING: &str = "Not a valid string.";

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds.
    #[serde(skip)]
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every update.
    #[serde(skip)]
    pub updated_at: i64,
}

/// Validated write payload for create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// Validates a JSON request payload.
    ///
    /// Every failing field is reported, not just the first one.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let Value::Object(fields) = payload else {
            let mut errors = ValidationErrors::default();
            errors.add(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_kind(payload)
                ),
            );
            return Err(errors);
        };

        let mut errors = ValidationErrors::default();
        let title = clean_text_field(fields, "title", Some(TITLE_MAX_CHARS), &mut errors);
        let content = clean_text_field(fields, "content", None, &mut errors);

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(Self { title, content }),
            _ => Err(errors),
        }
    }
}

/// Field name to messages, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Appends one message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of all fields with at least one message, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

fn clean_text_field(
    fields: &Map<String, Value>,
    name: &str,
    max_chars: Option<usize>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let raw = match fields.get(name) {
        None => {
            errors.add(name, MSG_REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(name, MSG_NULL);
            return None;
        }
        Some(Value::String(text)) => text.clone(),
        // Numbers are accepted and stored in their textual form.
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
            errors.add(name, MSG_NOT_STRING);
            return None;
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(name, MSG_BLANK);
        return None;
    }

    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            errors.add(
                name,
                format!("Ensure this field has no more than {max} characters."),
            );
            return None;
        }
    }

    Some(trimmed.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
