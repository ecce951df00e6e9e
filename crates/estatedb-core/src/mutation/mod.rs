//! Mutation planning: create/update/upsert/delete plans, nested relation
//! writes, and scalar-only batch variants.
//!
//! The planner is pure: every check below runs before a plan value exists,
//! and nothing here ever calls the execution service.

mod input;
mod validate;

pub use input::{RelationWrite, ScalarData, WriteInput};
pub use validate::{MutationError, WriteMode, validate_scalar_data, validate_write};

use crate::{
    model::{EntityModel, SchemaRegistry},
    query::{
        predicate::{Predicate, validate as validate_predicate},
        unique::{UniqueSelector, validate_unique_selector},
    },
};
use serde::{Deserialize, Serialize};

///
/// MutationPlan
///
/// Fully-validated write description. Batch variants carry a `returning`
/// flag (the AndReturn surface) instead of separate plan shapes.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MutationPlan {
    Create {
        entity: String,
        data: WriteInput,
    },
    CreateMany {
        entity: String,
        rows: Vec<ScalarData>,
        returning: bool,
    },
    Update {
        entity: String,
        selector: UniqueSelector,
        data: WriteInput,
    },
    UpdateMany {
        entity: String,
        filter: Option<Predicate>,
        data: ScalarData,
        limit: Option<u32>,
        returning: bool,
    },
    /// Create-or-update as a single logical step; branching is the execution
    /// service's concern, never the planner's.
    Upsert {
        entity: String,
        selector: UniqueSelector,
        create: WriteInput,
        update: WriteInput,
    },
    Delete {
        entity: String,
        selector: UniqueSelector,
    },
    DeleteMany {
        entity: String,
        filter: Option<Predicate>,
        limit: Option<u32>,
        returning: bool,
    },
}

impl MutationPlan {
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::Create { entity, .. }
            | Self::CreateMany { entity, .. }
            | Self::Update { entity, .. }
            | Self::UpdateMany { entity, .. }
            | Self::Upsert { entity, .. }
            | Self::Delete { entity, .. }
            | Self::DeleteMany { entity, .. } => entity,
        }
    }

    /// True when the execution service should hand affected rows back.
    #[must_use]
    pub const fn returns_rows(&self) -> bool {
        match self {
            Self::Create { .. } | Self::Update { .. } | Self::Upsert { .. } | Self::Delete { .. } => {
                true
            }
            Self::CreateMany { returning, .. }
            | Self::UpdateMany { returning, .. }
            | Self::DeleteMany { returning, .. } => *returning,
        }
    }
}

/// Plan a single-row create.
pub fn plan_create(
    registry: &SchemaRegistry,
    model: &EntityModel,
    data: WriteInput,
) -> Result<MutationPlan, MutationError> {
    validate_write(registry, model, &data, WriteMode::Create)?;

    Ok(MutationPlan::Create {
        entity: model.entity_name.to_string(),
        data,
    })
}

/// Plan a batch create over scalar-only rows.
pub fn plan_create_many(
    model: &EntityModel,
    rows: Vec<ScalarData>,
    returning: bool,
) -> Result<MutationPlan, MutationError> {
    for row in &rows {
        validate_scalar_data(model, row)?;
    }

    Ok(MutationPlan::CreateMany {
        entity: model.entity_name.to_string(),
        rows,
        returning,
    })
}

/// Plan a single-row update addressed by a unique selector.
pub fn plan_update(
    registry: &SchemaRegistry,
    model: &EntityModel,
    selector: UniqueSelector,
    data: WriteInput,
) -> Result<MutationPlan, MutationError> {
    validate_unique_selector(model, &selector)?;
    validate_write(registry, model, &data, WriteMode::Update)?;

    Ok(MutationPlan::Update {
        entity: model.entity_name.to_string(),
        selector,
        data,
    })
}

/// Plan a filtered batch update over scalar data.
pub fn plan_update_many(
    registry: &SchemaRegistry,
    model: &EntityModel,
    filter: Option<Predicate>,
    data: ScalarData,
    limit: Option<u32>,
    returning: bool,
) -> Result<MutationPlan, MutationError> {
    if let Some(filter) = &filter {
        validate_predicate(registry, model, filter)?;
    }
    validate_scalar_data(model, &data)?;

    Ok(MutationPlan::UpdateMany {
        entity: model.entity_name.to_string(),
        filter,
        data,
        limit,
        returning,
    })
}

/// Plan a single-row delete addressed by a unique selector.
pub fn plan_delete(
    model: &EntityModel,
    selector: UniqueSelector,
) -> Result<MutationPlan, MutationError> {
    validate_unique_selector(model, &selector)?;

    Ok(MutationPlan::Delete {
        entity: model.entity_name.to_string(),
        selector,
    })
}

/// Plan a filtered batch delete.
pub fn plan_delete_many(
    registry: &SchemaRegistry,
    model: &EntityModel,
    filter: Option<Predicate>,
    limit: Option<u32>,
    returning: bool,
) -> Result<MutationPlan, MutationError> {
    if let Some(filter) = &filter {
        validate_predicate(registry, model, filter)?;
    }

    Ok(MutationPlan::DeleteMany {
        entity: model.entity_name.to_string(),
        filter,
        limit,
        returning,
    })
}

///
/// UpsertBuilder
///
/// An upsert requires exactly one of each part: a unique-selector `where`, a
/// `create` payload, and an `update` payload. The builder rejects incomplete
/// shapes before planning proceeds.
///

#[derive(Clone, Debug, Default)]
pub struct UpsertBuilder {
    selector: Option<UniqueSelector>,
    create: Option<WriteInput>,
    update: Option<WriteInput>,
}

impl UpsertBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selector: None,
            create: None,
            update: None,
        }
    }

    #[must_use]
    pub fn where_unique(mut self, selector: UniqueSelector) -> Self {
        self.selector = Some(selector);
        self
    }

    #[must_use]
    pub fn create(mut self, input: WriteInput) -> Self {
        self.create = Some(input);
        self
    }

    #[must_use]
    pub fn update(mut self, input: WriteInput) -> Self {
        self.update = Some(input);
        self
    }

    pub fn build(
        self,
        registry: &SchemaRegistry,
        model: &EntityModel,
    ) -> Result<MutationPlan, MutationError> {
        let Some(selector) = self.selector else {
            return Err(MutationError::UpsertIncomplete { missing: "where" });
        };
        let Some(create) = self.create else {
            return Err(MutationError::UpsertIncomplete { missing: "create" });
        };
        let Some(update) = self.update else {
            return Err(MutationError::UpsertIncomplete { missing: "update" });
        };

        validate_unique_selector(model, &selector)?;
        validate_write(registry, model, &create, WriteMode::Create)?;
        validate_write(registry, model, &update, WriteMode::Update)?;

        Ok(MutationPlan::Upsert {
            entity: model.entity_name.to_string(),
            selector,
            create,
            update,
        })
    }
}

///
/// TESTS
///
