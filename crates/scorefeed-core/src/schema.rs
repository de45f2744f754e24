//! Structural contract for decoded payloads.
//!
//! A [`SchemaDescriptor`] maps top-level field names to a primitive
//! [`FieldType`]. Validation is fail-fast: fields are visited in ascending
//! name order and the first violation is returned. Fields absent from the
//! descriptor are never inspected.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Declared type of a top-level field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        ValueKind::of(value).as_field_type() == Some(self)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime category of a JSON value. `null` has no declarable counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ValueKind {
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub const fn as_field_type(self) -> Option<FieldType> {
        match self {
            Self::Null => None,
            Self::String => Some(FieldType::String),
            Self::Number => Some(FieldType::Number),
            Self::Boolean => Some(FieldType::Boolean),
            Self::Array => Some(FieldType::Array),
            Self::Object => Some(FieldType::Object),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self.as_field_type() {
            Some(field_type) => field_type.as_str(),
            None => "null",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    MissingKey,
    TypeMismatch,
}

/// First structural violation found in a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required field '{field}' is missing (expected {expected})")]
    MissingKey { field: String, expected: FieldType },

    #[error("field '{field}' expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: ValueKind,
    },
}

impl SchemaError {
    pub const fn kind(&self) -> SchemaErrorKind {
        match self {
            Self::MissingKey { .. } => SchemaErrorKind::MissingKey,
            Self::TypeMismatch { .. } => SchemaErrorKind::TypeMismatch,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::MissingKey { field, .. } | Self::TypeMismatch { field, .. } => field,
        }
    }

    pub const fn expected(&self) -> FieldType {
        match self {
            Self::MissingKey { expected, .. } | Self::TypeMismatch { expected, .. } => *expected,
        }
    }

    pub const fn actual(&self) -> Option<ValueKind> {
        match self {
            Self::MissingKey { .. } => None,
            Self::TypeMismatch { actual, .. } => Some(*actual),
        }
    }
}

/// Field name to type contract. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDescriptor {
    fields: BTreeMap<String, FieldType>,
}

impl SchemaDescriptor {
    pub fn new<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldType)>,
        K: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, field_type)| (name.into(), field_type))
                .collect(),
        }
    }

    /// Contract of the score feed rows: `id`, `name`, `score`, `timestamp`.
    pub fn scores() -> Self {
        Self::new([
            ("id", FieldType::Number),
            ("name", FieldType::String),
            ("score", FieldType::Number),
            ("timestamp", FieldType::String),
        ])
    }

    pub fn get(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields
            .iter()
            .map(|(name, field_type)| (name.as_str(), *field_type))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn validate(&self, payload: &Value) -> Result<(), SchemaError> {
        validate(payload, self)
    }
}

/// Check the declared top-level fields of `payload`.
///
/// A payload that is not an object has none of the declared fields.
pub fn validate(payload: &Value, schema: &SchemaDescriptor) -> Result<(), SchemaError> {
    let object = payload.as_object();

    for (field, expected) in schema.fields() {
        let Some(value) = object.and_then(|map| map.get(field)) else {
            return Err(SchemaError::MissingKey {
                field: field.to_owned(),
                expected,
            });
        };

        if !expected.matches(value) {
            return Err(SchemaError::TypeMismatch {
                field: field.to_owned(),
                expected,
                actual: ValueKind::of(value),
            });
        }
    }

    Ok(())
}
