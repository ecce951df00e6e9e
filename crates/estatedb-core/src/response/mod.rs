//! Materialized execution results and their typed interpretation.
//!
//! A `Row` is a sparse field map: a missing key means "field not selected",
//! while `Value::Null` is an explicit stored null. The two never collapse
//! into each other.

use crate::{
    traits::EntityKind,
    value::{Float64, Value},
};
use chrono::{DateTime, Utc};
use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ResponseError
/// Errors related to interpreting a materialized response.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ResponseError {
    #[error("expected exactly one row, found 0 (entity {entity})")]
    RecordNotFound { entity: String },

    #[error("expected at most one row, found {count} (entity {entity})")]
    NotUnique { entity: String, count: usize },

    #[error("row is missing field '{field}' (entity {entity})")]
    MissingField { entity: String, field: String },

    #[error("row field '{field}' holds {found}, expected {expected} (entity {entity})")]
    FieldType {
        entity: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("row field '{field}' holds unknown enum variant '{variant}' (entity {entity})")]
    UnknownEnumVariant {
        entity: String,
        field: String,
        variant: String,
    },
}

///
/// Row
/// One returned record as a sparse field map.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// True when the field was selected at all (even if its value is null).
    #[must_use]
    pub fn is_selected(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    //
    // Typed accessors used by generated `from_row` implementations.
    //

    pub fn int(&self, entity: &str, field: &str) -> Result<i64, ResponseError> {
        match self.required(entity, field)? {
            Value::Int(v) => Ok(*v),
            other => Err(self.field_type(entity, field, "int", other)),
        }
    }

    pub fn float(&self, entity: &str, field: &str) -> Result<Float64, ResponseError> {
        match self.required(entity, field)? {
            Value::Float(v) => Ok(*v),
            other => Err(self.field_type(entity, field, "float", other)),
        }
    }

    pub fn text(&self, entity: &str, field: &str) -> Result<String, ResponseError> {
        match self.required(entity, field)? {
            Value::Text(v) => Ok(v.clone()),
            other => Err(self.field_type(entity, field, "text", other)),
        }
    }

    pub fn opt_text(&self, entity: &str, field: &str) -> Result<Option<String>, ResponseError> {
        match self.required(entity, field)? {
            Value::Text(v) => Ok(Some(v.clone())),
            Value::Null => Ok(None),
            other => Err(self.field_type(entity, field, "text", other)),
        }
    }

    pub fn opt_int(&self, entity: &str, field: &str) -> Result<Option<i64>, ResponseError> {
        match self.required(entity, field)? {
            Value::Int(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            other => Err(self.field_type(entity, field, "int", other)),
        }
    }

    pub fn bool(&self, entity: &str, field: &str) -> Result<bool, ResponseError> {
        match self.required(entity, field)? {
            Value::Bool(v) => Ok(*v),
            other => Err(self.field_type(entity, field, "bool", other)),
        }
    }

    pub fn timestamp(&self, entity: &str, field: &str) -> Result<DateTime<Utc>, ResponseError> {
        match self.required(entity, field)? {
            Value::Timestamp(v) => Ok(*v),
            other => Err(self.field_type(entity, field, "timestamp", other)),
        }
    }

    pub fn opt_timestamp(
        &self,
        entity: &str,
        field: &str,
    ) -> Result<Option<DateTime<Utc>>, ResponseError> {
        match self.required(entity, field)? {
            Value::Timestamp(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            other => Err(self.field_type(entity, field, "timestamp", other)),
        }
    }

    pub fn enum_variant(&self, entity: &str, field: &str) -> Result<&str, ResponseError> {
        match self.required(entity, field)? {
            Value::Enum(v) => Ok(v.variant()),
            other => Err(self.field_type(entity, field, "enum", other)),
        }
    }

    fn required(&self, entity: &str, field: &str) -> Result<&Value, ResponseError> {
        self.get(field).ok_or_else(|| ResponseError::MissingField {
            entity: entity.to_string(),
            field: field.to_string(),
        })
    }

    fn field_type(
        &self,
        entity: &str,
        field: &str,
        expected: &'static str,
        found: &Value,
    ) -> ResponseError {
        ResponseError::FieldType {
            entity: entity.to_string(),
            field: field.to_string(),
            expected,
            found: found.kind_name(),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

///
/// Rows
/// Ordered materialized result set.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, IntoIterator, PartialEq, Serialize)]
pub struct Rows(#[into_iterator(owned, ref)] pub Vec<Row>);

impl Rows {
    #[must_use]
    pub const fn new(rows: Vec<Row>) -> Self {
        Self(rows)
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Require exactly one row; zero rows is a typed `RecordNotFound`.
    pub fn one(self, entity: &str) -> Result<Row, ResponseError> {
        match self.0.len() {
            0 => Err(ResponseError::RecordNotFound {
                entity: entity.to_string(),
            }),
            1 => Ok(self.0.into_iter().next().expect("length checked above")),
            count => Err(ResponseError::NotUnique {
                entity: entity.to_string(),
                count,
            }),
        }
    }

    /// Require at most one row.
    pub fn one_opt(self, entity: &str) -> Result<Option<Row>, ResponseError> {
        match self.0.len() {
            0 => Ok(None),
            1 => Ok(Some(self.0.into_iter().next().expect("length checked above"))),
            count => Err(ResponseError::NotUnique {
                entity: entity.to_string(),
                count,
            }),
        }
    }

    /// Decode every row into the typed binding.
    pub fn decode<E: EntityKind>(self) -> Result<Vec<E>, ResponseError> {
        self.0.iter().map(E::from_row).collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{ResponseError, Row, Rows};
    use crate::value::Value;

    fn row(id: i64) -> Row {
        Row::new().with("id", id)
    }

    #[test]
    fn one_translates_zero_rows_into_record_not_found() {
        let result = Rows::empty().one("Stage");

        assert!(matches!(
            result,
            Err(ResponseError::RecordNotFound { entity }) if entity == "Stage"
        ));
    }

    #[test]
    fn one_rejects_multiple_rows() {
        let result = Rows::new(vec![row(1), row(2)]).one("Stage");

        assert!(matches!(
            result,
            Err(ResponseError::NotUnique { count: 2, .. })
        ));
    }

    #[test]
    fn one_opt_distinguishes_absence_from_error() {
        assert_eq!(Rows::empty().one_opt("Stage"), Ok(None));
        assert!(Rows::new(vec![row(1)]).one_opt("Stage").is_ok());
    }

    #[test]
    fn null_and_unselected_fields_stay_distinct() {
        let row = Row::new().with("notes", Value::Null);

        assert!(row.is_selected("notes"));
        assert!(!row.is_selected("name"));
        assert_eq!(row.opt_text("Stage", "notes"), Ok(None));
        assert!(matches!(
            row.opt_text("Stage", "name"),
            Err(ResponseError::MissingField { field, .. }) if field == "name"
        ));
    }
}
