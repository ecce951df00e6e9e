use crate::{query::unique::UniqueSelector, traits::FieldValue, value::Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar-only payload used by batch mutations and update data.
pub type ScalarData = BTreeMap<String, Value>;

///
/// RelationWrite
///
/// The *checked* style of expressing a relation write: nested operations
/// addressing the target entity. The *unchecked* style is a raw FK scalar in
/// the data map; the two are mutually exclusive per relation field.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RelationWrite {
    /// Connect a to-one relation to an existing row.
    Connect(UniqueSelector),
    /// Connect a to-many relation to a set of existing rows.
    ConnectMany(Vec<UniqueSelector>),
    /// Create the to-one target row inline.
    Create(Box<WriteInput>),
}

impl RelationWrite {
    #[must_use]
    pub fn connect(selector: UniqueSelector) -> Self {
        Self::Connect(selector)
    }

    #[must_use]
    pub fn connect_many(selectors: impl IntoIterator<Item = UniqueSelector>) -> Self {
        Self::ConnectMany(selectors.into_iter().collect())
    }

    #[must_use]
    pub fn create(input: WriteInput) -> Self {
        Self::Create(Box::new(input))
    }

    /// Stable style label for diagnostics.
    #[must_use]
    pub const fn style(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::ConnectMany(_) => "connect_many",
            Self::Create(_) => "create",
        }
    }

    #[must_use]
    pub const fn is_to_many(&self) -> bool {
        matches!(self, Self::ConnectMany(_))
    }
}

///
/// WriteInput
///
/// One entity-level write payload: scalar assignments plus per-relation
/// nested operations. Building is unvalidated; the mutation planner owns
/// every structural check.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct WriteInput {
    pub scalars: ScalarData,
    pub relations: BTreeMap<String, RelationWrite>,
}

impl WriteInput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scalars: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl FieldValue) -> Self {
        self.scalars.insert(field.into(), value.to_value());
        self
    }

    /// Explicit soft null assignment.
    #[must_use]
    pub fn set_null(mut self, field: impl Into<String>) -> Self {
        self.scalars.insert(field.into(), Value::Null);
        self
    }

    #[must_use]
    pub fn relation(mut self, name: impl Into<String>, write: RelationWrite) -> Self {
        self.relations.insert(name.into(), write);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.relations.is_empty()
    }
}
