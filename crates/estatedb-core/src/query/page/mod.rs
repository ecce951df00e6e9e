//! Pagination contracts: offset/limit windows, cursor anchoring, and the
//! deterministic-ordering guarantee behind both.

use crate::{
    model::EntityModel,
    value::Value,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

///
/// OrderKey
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderKey {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderKey {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }
}

///
/// OrderSpec
///
/// Ordered sort-key list. A canonical spec always terminates with the
/// primary key as deterministic tie-break, so repeated cursor pagination is
/// stable across calls.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderSpec {
    pub keys: Vec<OrderKey>,
}

impl OrderSpec {
    #[must_use]
    pub const fn new(keys: Vec<OrderKey>) -> Self {
        Self { keys }
    }

    /// Default ordering contract: primary key ascending.
    #[must_use]
    pub fn primary_key(model: &EntityModel) -> Self {
        Self {
            keys: vec![OrderKey::asc(model.primary_key.name)],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.keys.iter().any(|key| key.field == field)
    }

    /// Append the primary-key tie-break when it is not already present.
    #[must_use]
    pub fn with_tie_break(mut self, model: &EntityModel) -> Self {
        if !self.contains(model.primary_key.name) {
            self.keys.push(OrderKey::asc(model.primary_key.name));
        }
        self
    }
}

///
/// PageSpec
///
/// Offset-style window. `take` is signed: positive takes forward from the
/// current position, negative takes backward, preserving "±n from cursor"
/// semantics.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PageSpec {
    pub skip: u32,
    pub take: Option<i64>,
}

impl PageSpec {
    #[must_use]
    pub const fn new(skip: u32, take: Option<i64>) -> Self {
        Self { skip, take }
    }

    #[must_use]
    pub const fn skip(rows: u32) -> Self {
        Self {
            skip: rows,
            take: None,
        }
    }

    #[must_use]
    pub const fn take(rows: i64) -> Self {
        Self {
            skip: 0,
            take: Some(rows),
        }
    }

    /// True when the spec actually constrains the result window.
    #[must_use]
    pub const fn is_windowed(&self) -> bool {
        self.skip > 0 || self.take.is_some()
    }

    #[must_use]
    pub const fn is_backward(&self) -> bool {
        matches!(self.take, Some(n) if n < 0)
    }
}

///
/// Cursor
///
/// Cursor-mode anchor: a unique row identified by one unique-selector field.
/// `skip`/`take` of the accompanying `PageSpec` are relative to this row's
/// position in the order-defined total order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Cursor {
    pub field: String,
    pub value: Value,
}

impl Cursor {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

///
/// PageError
/// Ordering/cursor validation failures.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum PageError {
    #[error("unknown order field '{field}'")]
    UnknownOrderField { field: String },

    #[error("order field '{field}' is not orderable")]
    UnorderableField { field: String },

    #[error("order field '{field}' appears multiple times")]
    DuplicateOrderField { field: String },

    #[error("cursor field '{field}' is not a unique selector")]
    CursorNotUnique { field: String },

    #[error("cursor value of kind {literal} does not match field '{field}'")]
    CursorValueMismatch { field: String, literal: &'static str },
}

/// Validate an explicit ordering against the entity schema.
pub fn validate_order(model: &EntityModel, order: &OrderSpec) -> Result<(), PageError> {
    let mut seen = Vec::new();
    for key in &order.keys {
        let Some(field) = model.field(&key.field) else {
            return Err(PageError::UnknownOrderField {
                field: key.field.clone(),
            });
        };
        if !field.kind.is_orderable() {
            return Err(PageError::UnorderableField {
                field: key.field.clone(),
            });
        }
        if seen.contains(&key.field.as_str()) {
            return Err(PageError::DuplicateOrderField {
                field: key.field.clone(),
            });
        }
        seen.push(&key.field);
    }

    Ok(())
}

/// Validate a cursor anchor: the field must be a unique selector and the
/// anchor value must match its type.
pub fn validate_cursor(model: &EntityModel, cursor: &Cursor) -> Result<(), PageError> {
    if !model.is_unique_selector(&cursor.field) {
        return Err(PageError::CursorNotUnique {
            field: cursor.field.clone(),
        });
    }

    let field = model
        .field(&cursor.field)
        .expect("unique selector fields exist on the model");
    if !field.kind.accepts(&cursor.value) {
        return Err(PageError::CursorValueMismatch {
            field: cursor.field.clone(),
            literal: cursor.value.kind_name(),
        });
    }

    Ok(())
}

/// Resolve the effective ordering for a paged read: the caller's explicit
/// order when given, otherwise primary key ascending; always canonicalized
/// with the primary-key tie-break.
#[must_use]
pub fn effective_order(model: &EntityModel, order: Option<OrderSpec>) -> OrderSpec {
    order
        .map_or_else(|| OrderSpec::primary_key(model), |spec| spec)
        .with_tie_break(model)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{
        Cursor, OrderKey, OrderSpec, PageError, PageSpec, effective_order, validate_cursor,
        validate_order,
    };
    use crate::test_support::{SALE_MODEL, STAGE_MODEL};

    #[test]
    fn default_order_is_primary_key_ascending() {
        let order = effective_order(&STAGE_MODEL, None);

        assert_eq!(order, OrderSpec::new(vec![OrderKey::asc("id")]));
    }

    #[test]
    fn explicit_order_gains_primary_key_tie_break() {
        let order = effective_order(&STAGE_MODEL, Some(OrderSpec::new(vec![
            OrderKey::desc("target"),
        ])));

        assert_eq!(
            order,
            OrderSpec::new(vec![OrderKey::desc("target"), OrderKey::asc("id")])
        );
    }

    #[test]
    fn tie_break_is_not_duplicated() {
        let order = effective_order(&STAGE_MODEL, Some(OrderSpec::new(vec![
            OrderKey::desc("id"),
        ])));

        assert_eq!(order, OrderSpec::new(vec![OrderKey::desc("id")]));
    }

    #[test]
    fn order_validation_rejects_unorderable_and_duplicate_fields() {
        let on_enum = OrderSpec::new(vec![OrderKey::asc("status")]);
        assert!(matches!(
            validate_order(&STAGE_MODEL, &on_enum),
            Err(PageError::UnorderableField { field }) if field == "status"
        ));

        let duplicated = OrderSpec::new(vec![OrderKey::asc("target"), OrderKey::desc("target")]);
        assert!(matches!(
            validate_order(&STAGE_MODEL, &duplicated),
            Err(PageError::DuplicateOrderField { field }) if field == "target"
        ));
    }

    #[test]
    fn cursor_requires_a_unique_selector() {
        let on_amount = Cursor::new("amount", 10i64);
        assert!(matches!(
            validate_cursor(&SALE_MODEL, &on_amount),
            Err(PageError::CursorNotUnique { field }) if field == "amount"
        ));

        let on_reference = Cursor::new("reference", "S-0042");
        assert!(validate_cursor(&SALE_MODEL, &on_reference).is_ok());
    }

    #[test]
    fn cursor_value_must_match_field_type() {
        let cursor = Cursor::new("id", "not-an-int");

        assert!(matches!(
            validate_cursor(&SALE_MODEL, &cursor),
            Err(PageError::CursorValueMismatch { field, .. }) if field == "id"
        ));
    }

    #[test]
    fn signed_take_encodes_direction() {
        assert!(!PageSpec::default().is_windowed());
        assert!(PageSpec::take(-5).is_backward());
        assert!(!PageSpec::take(5).is_backward());
        assert!(PageSpec::skip(3).is_windowed());
    }
}
