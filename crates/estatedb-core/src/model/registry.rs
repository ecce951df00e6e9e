use crate::model::entity::EntityModel;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// RegistryError
/// Schema-level contract violations detected when the registry is built.
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("duplicate entity '{entity}'")]
    DuplicateEntity { entity: String },

    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    #[error("entity '{entity}' declares duplicate field '{field}'")]
    DuplicateField { entity: String, field: String },

    #[error("primary key '{field}' not present in fields of entity '{entity}'")]
    InvalidPrimaryKey { entity: String, field: String },

    #[error("relation '{relation}' on entity '{entity}' targets unknown entity '{target}'")]
    UnknownRelationTarget {
        entity: String,
        relation: String,
        target: String,
    },

    #[error("relation '{relation}' on entity '{entity}' pairs unknown FK field '{field}'")]
    UnknownForeignKeyField {
        entity: String,
        relation: String,
        field: String,
    },
}

///
/// SchemaRegistry
///
/// Explicit, read-only schema surface passed into the planners.
/// Built once at startup; construction validates every model's internal
/// contract and cross-entity relation targets, so downstream planning can
/// assume resolvable metadata.
///

pub struct SchemaRegistry {
    entities: BTreeMap<&'static str, &'static EntityModel>,
}

impl SchemaRegistry {
    pub fn new(models: &[&'static EntityModel]) -> Result<Self, RegistryError> {
        let mut entities = BTreeMap::new();
        for model in models {
            validate_model(model)?;
            if entities.insert(model.entity_name, *model).is_some() {
                return Err(RegistryError::DuplicateEntity {
                    entity: model.entity_name.to_string(),
                });
            }
        }

        let registry = Self { entities };
        registry.validate_relation_targets()?;

        Ok(registry)
    }

    pub fn entity(&self, name: &str) -> Result<&'static EntityModel, RegistryError> {
        self.entities
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownEntity {
                entity: name.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &'static EntityModel> + '_ {
        self.entities.values().copied()
    }

    fn validate_relation_targets(&self) -> Result<(), RegistryError> {
        for model in self.entities.values() {
            for relation in model.relations {
                if !self.contains(relation.target) {
                    return Err(RegistryError::UnknownRelationTarget {
                        entity: model.entity_name.to_string(),
                        relation: relation.name.to_string(),
                        target: relation.target.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

// Validate one model's internal contract before it enters the registry.
fn validate_model(model: &EntityModel) -> Result<(), RegistryError> {
    let mut seen = BTreeSet::new();
    for field in model.fields {
        if !seen.insert(field.name) {
            return Err(RegistryError::DuplicateField {
                entity: model.entity_name.to_string(),
                field: field.name.to_string(),
            });
        }
    }

    if !model
        .fields
        .iter()
        .any(|field| std::ptr::eq(field, model.primary_key))
    {
        return Err(RegistryError::InvalidPrimaryKey {
            entity: model.entity_name.to_string(),
            field: model.primary_key.name.to_string(),
        });
    }

    for relation in model.relations {
        if let Some(fk_field) = relation.fk_field
            && model.field(fk_field).is_none()
        {
            return Err(RegistryError::UnknownForeignKeyField {
                entity: model.entity_name.to_string(),
                relation: relation.name.to_string(),
                field: fk_field.to_string(),
            });
        }
    }

    Ok(())
}

///
/// TESTS
///
