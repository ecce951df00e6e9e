use crate::model::{field::FieldModel, relation::RelationModel};

///
/// EntityModel
/// Static runtime model for one entity: the only schema surface the
/// planners depend on.
///

pub struct EntityModel {
    /// Fully-qualified Rust type path (for dispatch and diagnostics).
    pub path: &'static str,
    /// Stable external name used in plans and routing.
    pub entity_name: &'static str,
    /// Primary key field (points at an entry in `fields`).
    pub primary_key: &'static FieldModel,
    /// Ordered scalar field list (authoritative for runtime planning).
    pub fields: &'static [FieldModel],
    /// Relation descriptors (checked against the registry at startup).
    pub relations: &'static [RelationModel],
}

impl EntityModel {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&'static RelationModel> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    /// True when `name` is a legal where-unique selector: the primary key
    /// or a declared unique field.
    #[must_use]
    pub fn is_unique_selector(&self, name: &str) -> bool {
        self.field(name)
            .is_some_and(|field| field.unique || field.name == self.primary_key.name)
    }
}
