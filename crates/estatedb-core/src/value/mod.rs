//! Runtime literal values used by predicates, plans, and rows.
//!
//! `Value` is deliberately small: it covers exactly the scalar surface of the
//! CRM schema plus `List` for membership predicates and `Null` for explicit
//! soft-null round-trips. "Field not selected" is expressed by *absence* from
//! a row, never by `Null`.

mod float;

pub use float::{Float64, Float64Error};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ValueEnum
///
/// Wire-stable enum literal. Carries the exact external variant spelling
/// (for example `IN_PROGRESS`); planners validate it against the declared
/// variant set of the target field.
///

#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ValueEnum {
    variant: String,
}

impl ValueEnum {
    #[must_use]
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
        }
    }

    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl fmt::Display for ValueEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variant)
    }
}

///
/// Value
///

#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Bool(bool),
    Enum(ValueEnum),
    Float(Float64),
    Int(i64),
    /// Ordered list of values; used for `In`/`NotIn` membership literals.
    List(Vec<Self>),
    /// Explicit soft null. Distinct from a field being absent from a row.
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Stable variant label for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Enum(_) => "enum",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Enum(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Null => write!(f, "null"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Float64> for Value {
    fn from(v: Float64) -> Self {
        Self::Float(v)
    }
}

impl From<ValueEnum> for Value {
    fn from(v: ValueEnum) -> Self {
        Self::Enum(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{Float64, Value, ValueEnum};

    #[test]
    fn option_maps_to_explicit_null() {
        let absent: Option<&str> = None;

        assert_eq!(Value::from(absent), Value::Null);
        assert_eq!(Value::from(Some("note")), Value::Text("note".to_string()));
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(Value::Int(1).kind_name(), "int");
        assert_eq!(Value::Float(Float64::ZERO).kind_name(), "float");
        assert_eq!(Value::Enum(ValueEnum::new("SOLD")).kind_name(), "enum");
        assert_eq!(Value::Null.kind_name(), "null");
    }

    #[test]
    fn numeric_classification_covers_int_and_float() {
        assert!(Value::Int(7).is_numeric());
        assert!(Value::Float(Float64::ZERO).is_numeric());
        assert!(!Value::Text("7".to_string()).is_numeric());
    }
}
