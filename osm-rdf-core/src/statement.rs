//! Typed statements produced for each entity.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Timestamp;
use crate::vocab::{LOC_ERROR, LOC_ERROR_MESSAGE};

/// Rendering hint for the downstream serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatementKind {
    /// Boolean literal.
    Bool,
    /// Date-time literal.
    Date,
    /// Integer literal.
    Int,
    /// Plain string literal.
    Str,
    /// Reference to another entity.
    Ref,
    /// OSM tag; the predicate is the tag key.
    Tag,
    /// Line geometry literal.
    Way,
    /// Point geometry literal.
    Point,
}

/// Literal or reference carried by a [`Statement`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatementValue {
    /// A boolean.
    Bool(bool),
    /// A point in time.
    Date(Timestamp),
    /// An integer.
    Int(i64),
    /// Text, including qualified references.
    Text(String),
    /// Encoded geometry.
    Bytes(Vec<u8>),
}

impl From<bool> for StatementValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Timestamp> for StatementValue {
    fn from(value: Timestamp) -> Self {
        Self::Date(value)
    }
}

impl From<i64> for StatementValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for StatementValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<String> for StatementValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for StatementValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for StatementValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl fmt::Display for StatementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}ms", value.as_millis()),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::Bytes(value) => write!(f, "<{} bytes>", value.len()),
        }
    }
}

/// One `(kind, predicate, value)` fact about an entity.
///
/// # Examples
/// ```
/// use osm_rdf_core::{Statement, StatementKind, StatementValue};
///
/// let statement = Statement::new(StatementKind::Tag, "highway", "residential");
/// assert_eq!(statement.predicate, "highway");
/// assert_eq!(statement.value, StatementValue::Text("residential".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statement {
    /// Rendering hint.
    pub kind: StatementKind,
    /// Vocabulary term, tag key or qualified member id.
    pub predicate: String,
    /// Associated value.
    pub value: StatementValue,
}

impl Statement {
    /// Build a statement from anything convertible into its parts.
    pub fn new(
        kind: StatementKind,
        predicate: impl Into<String>,
        value: impl Into<StatementValue>,
    ) -> Self {
        Self {
            kind,
            predicate: predicate.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {} {}", self.kind, self.predicate, self.value)
    }
}

/// Placeholder recorded instead of a geometry that could not be encoded.
pub fn loc_err() -> Statement {
    Statement::new(StatementKind::Str, LOC_ERROR, LOC_ERROR_MESSAGE)
}
