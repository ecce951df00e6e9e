use crate::{
    model::{EntityModel, FieldModel, SchemaRegistry},
    mutation::input::{RelationWrite, ScalarData, WriteInput},
    query::{
        predicate::FilterError,
        unique::{SelectorError, validate_unique_selector},
    },
    value::Value,
};
use thiserror::Error as ThisError;

///
/// MutationError
///
/// Structural write-plan violations, all rejected before any execution
/// service call is made.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum MutationError {
    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("unknown relation '{relation}' on entity '{entity}'")]
    UnknownRelation { entity: String, relation: String },

    #[error("value of kind {literal} does not match {kind} field '{field}'")]
    ValueMismatch {
        field: String,
        kind: String,
        literal: &'static str,
    },

    #[error("null assigned to required field '{field}'")]
    NullForRequiredField { field: String },

    #[error("write style '{style}' does not match the cardinality of relation '{relation}'")]
    RelationArityMismatch {
        relation: String,
        style: &'static str,
    },

    /// Checked (nested) and unchecked (raw FK scalar) styles collide on one
    /// relation field.
    #[error("relation '{relation}' mixes a nested write with its raw foreign key '{fk_field}'")]
    UncheckedMixedWithChecked { relation: String, fk_field: String },

    #[error("batch rows accept scalar data only; relation '{relation}' is a nested write")]
    NestedWriteInBatch { relation: String },

    #[error("create plan leaves required relation '{relation}' unsatisfied")]
    RequiredRelationMissing { relation: String },

    #[error("upsert is missing its '{missing}' part")]
    UpsertIncomplete { missing: &'static str },

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

///
/// WriteMode
/// Create plans must satisfy required relations; update plans only touch
/// what they name.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Validate one entity-level write input, recursing through nested creates.
pub fn validate_write(
    registry: &SchemaRegistry,
    model: &EntityModel,
    input: &WriteInput,
    mode: WriteMode,
) -> Result<(), MutationError> {
    for (field, value) in &input.scalars {
        let field_model = ensure_scalar_field(model, field)?;
        ensure_assignable(field_model, value)?;
    }

    for (name, write) in &input.relations {
        let Some(relation) = model.relation(name) else {
            return Err(MutationError::UnknownRelation {
                entity: model.entity_name.to_string(),
                relation: name.clone(),
            });
        };

        if relation.arity.is_many() != write.is_to_many() {
            return Err(MutationError::RelationArityMismatch {
                relation: name.clone(),
                style: write.style(),
            });
        }

        // One style per relation: a nested write and its raw FK scalar are
        // two spellings of the same edge.
        if let Some(fk_field) = relation.fk_field
            && input.scalars.contains_key(fk_field)
        {
            return Err(MutationError::UncheckedMixedWithChecked {
                relation: name.clone(),
                fk_field: fk_field.to_string(),
            });
        }

        let target = registry
            .entity(relation.target)
            .map_err(|_| MutationError::UnknownRelation {
                entity: model.entity_name.to_string(),
                relation: name.clone(),
            })?;

        match write {
            RelationWrite::Connect(selector) => {
                validate_unique_selector(target, selector)?;
            }
            RelationWrite::ConnectMany(selectors) => {
                for selector in selectors {
                    validate_unique_selector(target, selector)?;
                }
            }
            RelationWrite::Create(nested) => {
                validate_write(registry, target, nested, WriteMode::Create)?;
            }
        }
    }

    if matches!(mode, WriteMode::Create) {
        validate_required_relations(model, input)?;
    }

    Ok(())
}

/// Validate one scalar-only batch payload. Keys naming relations are the
/// batch-specific failure; batch rows never carry nested writes.
pub fn validate_scalar_data(model: &EntityModel, data: &ScalarData) -> Result<(), MutationError> {
    for (field, value) in data {
        if model.relation(field).is_some() {
            return Err(MutationError::NestedWriteInBatch {
                relation: field.clone(),
            });
        }
        let field_model = ensure_scalar_field(model, field)?;
        ensure_assignable(field_model, value)?;
    }

    Ok(())
}

// Fail fast when a create leaves a required to-one relation unsatisfied in
// both styles. Row existence stays with the execution service's FK checks.
fn validate_required_relations(
    model: &EntityModel,
    input: &WriteInput,
) -> Result<(), MutationError> {
    for relation in model.relations {
        if relation.arity.is_many() || !relation.required {
            continue;
        }

        let checked = input.relations.contains_key(relation.name);
        let unchecked = relation
            .fk_field
            .is_some_and(|fk| matches!(input.scalars.get(fk), Some(value) if !value.is_null()));

        if !checked && !unchecked {
            return Err(MutationError::RequiredRelationMissing {
                relation: relation.name.to_string(),
            });
        }
    }

    Ok(())
}

fn ensure_scalar_field<'a>(
    model: &'a EntityModel,
    field: &str,
) -> Result<&'a FieldModel, MutationError> {
    model.field(field).ok_or_else(|| MutationError::UnknownField {
        entity: model.entity_name.to_string(),
        field: field.to_string(),
    })
}

fn ensure_assignable(field: &FieldModel, value: &Value) -> Result<(), MutationError> {
    if value.is_null() {
        if field.nullable {
            return Ok(());
        }
        return Err(MutationError::NullForRequiredField {
            field: field.name.to_string(),
        });
    }

    if !field.kind.accepts(value) {
        return Err(MutationError::ValueMismatch {
            field: field.name.to_string(),
            kind: field.kind.to_string(),
            literal: value.kind_name(),
        });
    }

    Ok(())
}
