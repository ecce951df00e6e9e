use crate::{model::EntityModel, value::Value};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// UniqueSelector
///
/// Where-unique lookup: one field/value pair addressing at most one row.
/// Only the primary key or a declared unique field is a legal selector.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UniqueSelector {
    pub field: String,
    pub value: Value,
}

impl UniqueSelector {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

///
/// SelectorError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SelectorError {
    #[error("unknown field '{field}' used as unique selector")]
    UnknownField { field: String },

    #[error("field '{field}' is not a unique selector")]
    NonUniqueSelector { field: String },

    #[error("selector value of kind {literal} does not match field '{field}'")]
    ValueMismatch { field: String, literal: &'static str },
}

/// Validate a where-unique selector against the entity schema.
pub fn validate_unique_selector(
    model: &EntityModel,
    selector: &UniqueSelector,
) -> Result<(), SelectorError> {
    let Some(field) = model.field(&selector.field) else {
        return Err(SelectorError::UnknownField {
            field: selector.field.clone(),
        });
    };

    if !model.is_unique_selector(&selector.field) {
        return Err(SelectorError::NonUniqueSelector {
            field: selector.field.clone(),
        });
    }

    if !field.kind.accepts(&selector.value) {
        return Err(SelectorError::ValueMismatch {
            field: selector.field.clone(),
            literal: selector.value.kind_name(),
        });
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{SelectorError, UniqueSelector, validate_unique_selector};
    use crate::test_support::SALE_MODEL;

    #[test]
    fn primary_key_and_unique_fields_are_legal_selectors() {
        assert!(validate_unique_selector(&SALE_MODEL, &UniqueSelector::new("id", 7i64)).is_ok());
        assert!(
            validate_unique_selector(&SALE_MODEL, &UniqueSelector::new("reference", "S-1")).is_ok()
        );
    }

    #[test]
    fn non_unique_fields_are_rejected() {
        let selector = UniqueSelector::new("amount", 10i64);

        assert!(matches!(
            validate_unique_selector(&SALE_MODEL, &selector),
            Err(SelectorError::NonUniqueSelector { field }) if field == "amount"
        ));
    }

    #[test]
    fn selector_values_must_match_field_type() {
        let selector = UniqueSelector::new("id", "seven");

        assert!(matches!(
            validate_unique_selector(&SALE_MODEL, &selector),
            Err(SelectorError::ValueMismatch { field, .. }) if field == "id"
        ));
    }
}
