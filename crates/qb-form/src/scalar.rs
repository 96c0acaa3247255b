//! Scalar field types understood by the form engine.
//!
//! Every form field holds exactly one scalar. The [`Scalar`] trait ties a Rust
//! type to its textual form representation, and [`FieldValue`] is the tagged
//! variant handed to validators once a submitted string has been converted.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of scalar a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    Password,
    Integer,
    Boolean,
    Timestamp,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A secret string entered through a password input.
///
/// Behaves like a `String` for storage, but never prints its contents through
/// `Debug` and is never echoed back into rendered markup.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The secret itself.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(\"***\")")
    }
}

impl From<&str> for Password {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for Password {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

/// A converted field value, as seen by validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Password(Password),
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Text(_) => ScalarKind::Text,
            Self::Password(_) => ScalarKind::Password,
            Self::Integer(_) => ScalarKind::Integer,
            Self::Boolean(_) => ScalarKind::Boolean,
            Self::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    /// The textual content of `Text` and `Password` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Password(secret) => Some(secret.expose()),
            Self::Integer(_) | Self::Boolean(_) | Self::Timestamp(_) => None,
        }
    }
}

/// A submitted string could not be converted into the field's scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read {raw:?} as {kind}")]
pub struct ParseScalarError {
    pub kind: ScalarKind,
    pub raw: String,
}

impl ParseScalarError {
    fn new(kind: ScalarKind, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
        }
    }
}

/// A Rust type that can back a form field.
///
/// `Default` is the zero value a field falls back to when its submitted value
/// cannot be converted, or is rejected and not preserved.
pub trait Scalar: Clone + Default + Send + Sync + 'static {
    const KIND: ScalarKind;

    /// Convert a submitted string.
    ///
    /// # Errors
    ///
    /// Returns `ParseScalarError` if `raw` is not a valid representation.
    fn parse_form(raw: &str) -> Result<Self, ParseScalarError>;

    /// The string placed in the `value` of the rendered input.
    fn to_form(&self) -> String;

    fn to_field_value(&self) -> FieldValue;
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn parse_form(raw: &str) -> Result<Self, ParseScalarError> {
        Ok(raw.to_string())
    }

    fn to_form(&self) -> String {
        self.clone()
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl Scalar for Password {
    const KIND: ScalarKind = ScalarKind::Password;

    fn parse_form(raw: &str) -> Result<Self, ParseScalarError> {
        Ok(Self::new(raw))
    }

    fn to_form(&self) -> String {
        self.0.clone()
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Password(self.clone())
    }
}

impl Scalar for i64 {
    const KIND: ScalarKind = ScalarKind::Integer;

    fn parse_form(raw: &str) -> Result<Self, ParseScalarError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| ParseScalarError::new(Self::KIND, raw))
    }

    fn to_form(&self) -> String {
        self.to_string()
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn parse_form(raw: &str) -> Result<Self, ParseScalarError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "off" | "0" => Ok(false),
            "true" | "on" | "1" => Ok(true),
            _ => Err(ParseScalarError::new(Self::KIND, raw)),
        }
    }

    fn to_form(&self) -> String {
        self.to_string()
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl Scalar for DateTime<Utc> {
    const KIND: ScalarKind = ScalarKind::Timestamp;

    fn parse_form(raw: &str) -> Result<Self, ParseScalarError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|time| time.with_timezone(&Utc))
            .map_err(|_| ParseScalarError::new(Self::KIND, raw))
    }

    fn to_form(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Timestamp(*self)
    }
}
