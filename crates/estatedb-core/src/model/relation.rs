///
/// RelationArity
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationArity {
    /// To-one (required or optional, per `RelationModel::required`).
    One,
    /// To-many, including many-to-many link relations.
    Many,
}

impl RelationArity {
    #[must_use]
    pub const fn is_many(self) -> bool {
        matches!(self, Self::Many)
    }
}

///
/// RelationModel
///
/// Runtime relation descriptor. A to-one owning side carries the scalar
/// foreign-key field it is paired with, so checked (nested) and unchecked
/// (raw scalar) write styles can be cross-checked against each other.
///

pub struct RelationModel {
    /// Relation name as used in predicates, selections, and write inputs.
    pub name: &'static str,
    /// Entity name of the relation target.
    pub target: &'static str,
    pub arity: RelationArity,
    /// A create plan must satisfy this relation. Only meaningful for `One`.
    pub required: bool,
    /// Scalar FK field on this entity (owning to-one side only).
    pub fk_field: Option<&'static str>,
}
