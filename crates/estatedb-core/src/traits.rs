//! Core traits connecting typed entity bindings to the planning layer.

use crate::{
    model::EntityModel,
    response::{ResponseError, Row},
    value::{Float64, Value, ValueEnum},
};
use chrono::{DateTime, Utc};

///
/// EntityKind
///
/// Marker trait implemented by generated entity bindings. Carries the static
/// runtime model and the row mapping in both directions.
///

pub trait EntityKind: Sized {
    /// Fully-qualified Rust type path (for diagnostics).
    const PATH: &'static str;

    /// Static runtime model for this entity.
    const MODEL: &'static EntityModel;

    /// Decode one returned row into the typed binding.
    fn from_row(row: &Row) -> Result<Self, ResponseError>;

    /// Encode the binding as a full row (soft nulls become `Value::Null`).
    fn to_row(&self) -> Row;
}

///
/// FieldValue
///
/// Conversion from host values into runtime literals, used by the fluent
/// predicate builders and write inputs.
///

pub trait FieldValue {
    fn to_value(&self) -> Value;
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FieldValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl FieldValue for i32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl FieldValue for u32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl FieldValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FieldValue for Float64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FieldValue for ValueEnum {
    fn to_value(&self) -> Value {
        Value::Enum(self.clone())
    }
}

impl FieldValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }
}
