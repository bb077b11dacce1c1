pub mod address;
pub mod contact;
pub mod schema;

pub use schema::{FieldKind, FieldRule, Schema};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A single rejected field with a client-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All field errors collected while validating one payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("\"{}\" {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(". ")
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

/// Validate `input` against `schema` and return the normalized object.
///
/// Every rule is checked so the caller gets the full list of problems at once.
/// Unknown keys are dropped, `null` counts as absent, and positive integers given
/// as strings are converted to numbers.
pub fn validate(schema: &Schema, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
    let empty = Map::new();
    let object = match input {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(ValidationErrors::single(schema.name, "must be of type object")),
    };

    let mut normalized = Map::new();
    let mut errors = Vec::new();

    for rule in schema.fields {
        match object.get(rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    errors.push(FieldError::new(rule.name, "is required"));
                }
            }
            Some(value) => match check_field(rule, value) {
                Ok(normalized_value) => {
                    normalized.insert(rule.name.to_string(), normalized_value);
                }
                Err(message) => errors.push(FieldError::new(rule.name, message)),
            },
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Validate and deserialize into a typed request.
pub fn validate_as<T: DeserializeOwned>(schema: &Schema, input: &Value) -> Result<T, ValidationErrors> {
    let normalized = validate(schema, input)?;
    serde_json::from_value(Value::Object(normalized))
        .map_err(|e| ValidationErrors::single(schema.name, e.to_string()))
}

/// Validate a bare identifier such as a path parameter.
pub fn validate_id(field: &str, raw: &str) -> Result<i32, ValidationErrors> {
    check_positive_int(&Value::String(raw.to_string()))
        .map_err(|message| ValidationErrors::single(field, message))
}

fn check_field(rule: &FieldRule, value: &Value) -> Result<Value, String> {
    match rule.kind {
        FieldKind::PositiveInt => check_positive_int(value).map(Value::from),
        FieldKind::Text | FieldKind::Email | FieldKind::Phone => {
            let text = value.as_str().ok_or_else(|| "must be a string".to_string())?;
            if text.is_empty() {
                return Err("is not allowed to be empty".to_string());
            }
            if let Some(max) = rule.max_len {
                if text.chars().count() > max {
                    return Err(format!(
                        "length must be less than or equal to {} characters long",
                        max
                    ));
                }
            }
            match rule.kind {
                FieldKind::Email if !is_email(text) => Err("must be a valid email".to_string()),
                FieldKind::Phone if !is_phone(text) => Err("must be a valid phone number".to_string()),
                _ => Ok(Value::String(text.to_string())),
            }
        }
    }
}

fn check_positive_int(value: &Value) -> Result<i32, String> {
    let number = match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| "must be an integer".to_string())?,
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| "must be a number".to_string())?,
        _ => return Err("must be a number".to_string()),
    };

    if number < 1 {
        return Err("must be a positive number".to_string());
    }
    i32::try_from(number).map_err(|_| format!("must be less than or equal to {}", i32::MAX))
}

fn is_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

fn is_phone(text: &str) -> bool {
    let digits = text.strip_prefix('+').unwrap_or(text);
    digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}
