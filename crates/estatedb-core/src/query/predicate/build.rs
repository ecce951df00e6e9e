use crate::{
    query::predicate::ast::{CompareOp, Predicate, RelationFilter},
    traits::FieldValue,
    value::Value,
};

///
/// FieldRef
///
/// Fluent constructor for field-level comparison predicates.
/// Produces plain `Predicate` values; nothing is validated here.
///

#[derive(Clone, Debug)]
pub struct FieldRef {
    name: String,
}

impl FieldRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn eq(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.name, CompareOp::Eq, value.to_value())
    }

    #[must_use]
    pub fn ne(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.name, CompareOp::Ne, value.to_value())
    }

    #[must_use]
    pub fn lt(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.name, CompareOp::Lt, value.to_value())
    }

    #[must_use]
    pub fn lte(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.name, CompareOp::Lte, value.to_value())
    }

    #[must_use]
    pub fn gt(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.name, CompareOp::Gt, value.to_value())
    }

    #[must_use]
    pub fn gte(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.name, CompareOp::Gte, value.to_value())
    }

    #[must_use]
    pub fn in_(self, values: impl IntoIterator<Item = impl FieldValue>) -> Predicate {
        let items = values.into_iter().map(|v| v.to_value()).collect();
        Predicate::compare(self.name, CompareOp::In, Value::List(items))
    }

    #[must_use]
    pub fn not_in(self, values: impl IntoIterator<Item = impl FieldValue>) -> Predicate {
        let items = values.into_iter().map(|v| v.to_value()).collect();
        Predicate::compare(self.name, CompareOp::NotIn, Value::List(items))
    }

    #[must_use]
    pub fn contains(self, value: impl Into<String>) -> Predicate {
        Predicate::compare(self.name, CompareOp::Contains, Value::Text(value.into()))
    }

    #[must_use]
    pub fn starts_with(self, value: impl Into<String>) -> Predicate {
        Predicate::compare(self.name, CompareOp::StartsWith, Value::Text(value.into()))
    }

    #[must_use]
    pub fn ends_with(self, value: impl Into<String>) -> Predicate {
        Predicate::compare(self.name, CompareOp::EndsWith, Value::Text(value.into()))
    }

    #[must_use]
    pub fn is_null(self) -> Predicate {
        Predicate::is_null(self.name)
    }
}

///
/// RelationRef
///
/// Fluent constructor for relation-quantified predicates.
///

#[derive(Clone, Debug)]
pub struct RelationRef {
    name: String,
}

impl RelationRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Every related row matches (vacuously true on empty relations).
    #[must_use]
    pub fn every(self, predicate: Predicate) -> Predicate {
        Predicate::relation(self.name, RelationFilter::Every(Box::new(predicate)))
    }

    /// At least one related row matches.
    #[must_use]
    pub fn some(self, predicate: Predicate) -> Predicate {
        Predicate::relation(self.name, RelationFilter::Some(Box::new(predicate)))
    }

    /// No related row matches.
    #[must_use]
    pub fn none(self, predicate: Predicate) -> Predicate {
        Predicate::relation(self.name, RelationFilter::None(Box::new(predicate)))
    }

    /// The to-one target matches.
    #[must_use]
    pub fn is(self, predicate: Predicate) -> Predicate {
        Predicate::relation(self.name, RelationFilter::Is(Box::new(predicate)))
    }

    /// The to-one target does not match.
    #[must_use]
    pub fn is_not(self, predicate: Predicate) -> Predicate {
        Predicate::relation(self.name, RelationFilter::IsNot(Box::new(predicate)))
    }
}

///
/// TESTS
///
