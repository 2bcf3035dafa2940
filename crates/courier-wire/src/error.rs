//! Error types for reading and composing wire messages.
//!
//! Every positional variant carries an absolute byte offset into the original
//! request buffer, regardless of how deeply the failing field was nested.

use thiserror::Error;

use crate::field::Shape;

/// Errors raised while reading or composing a wire message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WireError {
    /// A required delimiter was not found where the grammar demands it.
    #[error("'{expected}' is missing in the data at position {position}")]
    MissingDelimiter {
        /// The delimiter that was expected.
        expected: char,
        /// Absolute offset where the delimiter should have appeared.
        position: usize,
    },

    /// A field began without a key.
    #[error("expected a field name at position {position}")]
    EmptyKey {
        /// Absolute offset where the key should have started.
        position: usize,
    },

    /// The buffer ended after a key and its `:` separator.
    #[error("field '{key}' has no value at position {position}")]
    MissingValue {
        /// Key whose value is absent.
        key: String,
        /// Absolute offset where the value should have started.
        position: usize,
    },

    /// Non-whitespace content followed the last expected field.
    #[error("unexpected data {} at position {position}", describe_after(after.as_deref()))]
    TrailingData {
        /// Key of the last field read, if any field was read.
        after: Option<String>,
        /// Absolute offset of the first unexpected character.
        position: usize,
    },

    /// The buffer ended before every expected field was read.
    #[error("missing fields: {}", names.join(", "))]
    MissingFields {
        /// Expected names that were never read, in the order they were requested.
        names: Vec<String>,
    },

    /// A field name was read that the caller did not ask for.
    #[error("unexpected field '{key}' at position {position}")]
    UnexpectedField {
        /// The key that was read.
        key: String,
        /// Absolute offset of the key.
        position: usize,
    },

    /// The same field name appeared twice in one record.
    #[error("duplicate field '{key}' at position {position}")]
    DuplicateField {
        /// The repeated key.
        key: String,
        /// Absolute offset of the second occurrence.
        position: usize,
    },

    /// A field value had the wrong shape for its key.
    #[error("expected {expected} for '{key}' at position {position}")]
    InvalidShape {
        /// Key of the offending field.
        key: String,
        /// The shape the caller required.
        expected: ShapeKind,
        /// Absolute offset where the value starts.
        position: usize,
    },

    /// A value cannot be written without escaping, which the format lacks.
    #[error("value for '{key}' cannot contain '\"'")]
    UnrepresentableValue {
        /// Key of the value being composed.
        key: String,
    },

    /// A value nested in an object would close or open its parent early.
    #[error("value for '{key}' must balance '{{' and '}}' inside an object")]
    UnbalancedBraces {
        /// Key of the value being composed.
        key: String,
    },

    /// A key cannot be written because it contains a separator.
    #[error("field name '{key}' must be non-empty and free of whitespace, ':' and '\"'")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}

/// Coarse shape classification used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A quoted or bare string.
    Scalar,
    /// A brace-delimited nested object.
    Object,
}

impl ShapeKind {
    /// Classifies a concrete field shape.
    #[must_use]
    pub const fn of(shape: Shape) -> Self {
        match shape {
            Shape::Quoted | Shape::Bare => Self::Scalar,
            Shape::Object => Self::Object,
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => formatter.write_str("a string"),
            Self::Object => formatter.write_str("a nested object"),
        }
    }
}

fn describe_after(after: Option<&str>) -> String {
    after.map_or_else(
        || String::from("before the first field"),
        |key| format!("after the {key}"),
    )
}

impl WireError {
    /// Creates a missing delimiter error.
    #[must_use]
    pub const fn missing_delimiter(expected: char, position: usize) -> Self {
        Self::MissingDelimiter { expected, position }
    }

    /// Creates an invalid shape error for `key`.
    #[must_use]
    pub fn invalid_shape(key: impl Into<String>, expected: ShapeKind, position: usize) -> Self {
        Self::InvalidShape {
            key: key.into(),
            expected,
            position,
        }
    }

    /// Creates a missing fields error from the names that were not read.
    #[must_use]
    pub fn missing_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the absolute offset associated with the error, when it has one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::MissingDelimiter { position, .. }
            | Self::EmptyKey { position }
            | Self::MissingValue { position, .. }
            | Self::TrailingData { position, .. }
            | Self::UnexpectedField { position, .. }
            | Self::DuplicateField { position, .. }
            | Self::InvalidShape { position, .. } => Some(*position),
            Self::MissingFields { .. }
            | Self::UnrepresentableValue { .. }
            | Self::UnbalancedBraces { .. }
            | Self::InvalidKey { .. } => None,
        }
    }
}
