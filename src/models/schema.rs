//! Request shape checking and validation.
//!
//! Every request body goes through three passes before a handler sees it:
//! the raw bytes must be a JSON object, the object must match the type's
//! declared field table, and the typed value must pass `validator` rules.
//! All violations found in a pass are reported together.

use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// JSON type expected at a field path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer or float
    Number,
    /// Integral number that fits in an `i32`; `70.0` counts
    Integer,
    String,
    StringList,
    Object,
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            FieldKind::Number => "a number",
            FieldKind::Integer => "an integer",
            FieldKind::String => "a string",
            FieldKind::StringList => "a list of strings",
            FieldKind::Object => "an object",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Number => value.is_number(),
            FieldKind::Integer => match value {
                Value::Number(number) => integral_i32(number).is_some(),
                _ => false,
            },
            FieldKind::String => value.is_string(),
            FieldKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Object => value.is_object(),
        }
    }
}

/// One entry of a request type's field table.
///
/// `path` is dot-separated for nested objects (`origin.lat`).
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub path: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(path: &'static str, kind: FieldKind) -> Self {
        Self { path, kind, required: true }
    }

    pub const fn optional(path: &'static str, kind: FieldKind) -> Self {
        Self { path, kind, required: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    InvalidType,
    InvalidValue,
    InvalidJson,
}

/// A single field-level problem reported back to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(field, FieldErrorKind::Missing, "field required")
    }

    fn wrong_type(field: &str, kind: FieldKind) -> Self {
        Self::new(
            field,
            FieldErrorKind::InvalidType,
            format!("expected {}", kind.describe()),
        )
    }
}

/// Failed validation of a whole request
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub errors: Vec<FieldError>,
}

impl SchemaError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(error: FieldError) -> Self {
        Self { errors: vec![error] }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for SchemaError {}

impl From<ValidationErrors> for SchemaError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed `{}` check", error.code));
                    FieldError::new(field.to_string(), FieldErrorKind::InvalidValue, message)
                })
            })
            .collect();
        // HashMap iteration order is unstable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors: fields }
    }
}

/// A request payload with a declared field table
pub trait Schema: DeserializeOwned + Validate {
    const FIELDS: &'static [FieldSpec];
}

enum Lookup<'a> {
    /// An enclosing object is absent; its own entry reports it
    ParentAbsent,
    Missing,
    Null,
    Found(&'a Value),
}

fn lookup<'a>(root: &'a Value, path: &str) -> Lookup<'a> {
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let Some(object) = current.as_object() else {
            return Lookup::ParentAbsent;
        };
        match object.get(segment) {
            None if segments.peek().is_none() => return Lookup::Missing,
            Some(Value::Null) if segments.peek().is_none() => return Lookup::Null,
            None | Some(Value::Null) => return Lookup::ParentAbsent,
            Some(value) => current = value,
        }
    }
    Lookup::Found(current)
}

/// Check a JSON value against a field table, collecting every violation
pub fn check_shape(value: &Value, fields: &[FieldSpec]) -> Vec<FieldError> {
    if !value.is_object() {
        return vec![FieldError::new(
            "body",
            FieldErrorKind::InvalidType,
            "expected a JSON object",
        )];
    }

    let mut errors = Vec::new();
    for spec in fields {
        match lookup(value, spec.path) {
            Lookup::ParentAbsent => {}
            Lookup::Missing if spec.required => errors.push(FieldError::missing(spec.path)),
            Lookup::Null if spec.required => {
                errors.push(FieldError::new(spec.path, FieldErrorKind::InvalidType, "may not be null"))
            }
            Lookup::Missing | Lookup::Null => {}
            Lookup::Found(found) if !spec.kind.accepts(found) => {
                errors.push(FieldError::wrong_type(spec.path, spec.kind))
            }
            Lookup::Found(_) => {}
        }
    }
    errors
}

/// Run the shape, deserialization and validation passes over a parsed body
pub fn parse_value<T: Schema>(value: Value) -> Result<T, SchemaError> {
    let shape_errors = check_shape(&value, T::FIELDS);
    if !shape_errors.is_empty() {
        return Err(SchemaError::new(shape_errors));
    }

    let parsed: T = serde_json::from_value(value).map_err(|e| {
        SchemaError::single(FieldError::new("body", FieldErrorKind::InvalidValue, e.to_string()))
    })?;

    parsed.validate()?;
    Ok(parsed)
}

fn invalid_json(err: serde_json::Error) -> SchemaError {
    SchemaError::single(FieldError::new(
        "body",
        FieldErrorKind::InvalidJson,
        format!("invalid JSON: {}", err),
    ))
}

/// Parse raw body bytes into a validated request
pub fn parse_slice<T: Schema>(body: &[u8]) -> Result<T, SchemaError> {
    let value: Value = serde_json::from_slice(body).map_err(invalid_json)?;
    parse_value(value)
}

/// Like [`parse_slice`], but an empty body or JSON `null` means "absent"
pub fn parse_optional_slice<T: Schema>(body: &[u8]) -> Result<Option<T>, SchemaError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body).map_err(invalid_json)?;
    if value.is_null() {
        return Ok(None);
    }
    parse_value(value).map(Some)
}

/// Read a required, finite float from query parameters
pub fn required_query_number(
    params: &HashMap<String, String>,
    field: &str,
) -> Result<f64, FieldError> {
    let raw = params.get(field).ok_or_else(|| FieldError::missing(field))?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(FieldError::new(field, FieldErrorKind::InvalidValue, "must be finite")),
        Err(_) => Err(FieldError::wrong_type(field, FieldKind::Number)),
    }
}

fn integral_i32(number: &Number) -> Option<i32> {
    if let Some(n) = number.as_i64() {
        return i32::try_from(n).ok();
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX))
        .map(|f| f as i32)
}

/// Deserialize an optional `i32`, accepting integral floats such as `70.0`
pub fn optional_integral<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(number) => integral_i32(&number)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", number))),
    }
}

/// Deserialize `null` as the type's default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
