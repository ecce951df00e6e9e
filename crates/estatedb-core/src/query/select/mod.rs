//! Relation-graph loading: nested include/select trees resolved into flat
//! selection plans.
//!
//! The CRM schema is mutually referential (Apartment↔Client through both
//! ownership and interest), so resolution walks with an explicit depth limit
//! and a visited-edge set instead of trusting the input tree to terminate.

use crate::model::{EntityModel, SchemaRegistry};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// SelectionError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SelectionError {
    /// `select` and `include` are mutually exclusive field-selection modes.
    #[error("entity '{entity}' mixes select and include at the same level")]
    AmbiguousSelection { entity: String },

    #[error("unknown field '{field}' selected on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("unknown relation '{relation}' on entity '{entity}'")]
    UnknownRelation { entity: String, relation: String },

    #[error("selection exceeds maximum relation depth {max_depth}")]
    DepthExceeded { max_depth: usize },

    #[error("cyclic include: relation '{relation}' on entity '{entity}' revisited")]
    CyclicInclude { entity: String, relation: String },
}

///
/// SelectionLimits
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectionLimits {
    /// Maximum relation traversal depth. The default covers the deepest
    /// chain that still terminates in scalars (Apartment→Client→apartments→
    /// project).
    pub max_depth: usize,
}

impl SelectionLimits {
    pub const DEFAULT_MAX_DEPTH: usize = 4;

    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH)
    }
}

///
/// RelationPick
/// One relation entry in a selection input, with its nested selection.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RelationPick {
    pub relation: String,
    /// Count-only terminal: resolves to a lightweight `_count` node that
    /// never expands related rows.
    pub count_only: bool,
    pub nested: Option<SelectionInput>,
}

impl RelationPick {
    #[must_use]
    pub fn expand(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            count_only: false,
            nested: None,
        }
    }

    #[must_use]
    pub fn count(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            count_only: true,
            nested: None,
        }
    }

    #[must_use]
    pub fn with_nested(mut self, nested: SelectionInput) -> Self {
        self.nested = Some(nested);
        self
    }
}

///
/// FieldPick
/// One entry of an explicit `select` list.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FieldPick {
    Scalar(String),
    Relation(RelationPick),
}

impl FieldPick {
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }
}

///
/// SelectionInput
///
/// Caller-supplied selection for one level. `select` and `include` can both
/// be populated by a confused caller; `resolve` rejects that shape instead
/// of making it unrepresentable, mirroring the runtime-validation contract.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectionInput {
    pub select: Option<Vec<FieldPick>>,
    pub include: Option<Vec<RelationPick>>,
}

impl SelectionInput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            select: None,
            include: None,
        }
    }

    #[must_use]
    pub fn select(mut self, picks: Vec<FieldPick>) -> Self {
        self.select = Some(picks);
        self
    }

    #[must_use]
    pub fn include(mut self, picks: Vec<RelationPick>) -> Self {
        self.include = Some(picks);
        self
    }
}

///
/// RelationSelectionKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RelationSelectionKind {
    /// `_count` terminal; the executor returns a count, not rows.
    Count,
    Expand(Box<SelectionPlan>),
}

///
/// RelationSelection
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RelationSelection {
    pub relation: String,
    pub target: String,
    pub kind: RelationSelectionKind,
}

///
/// SelectionPlan
///
/// Resolved selection for one entity level: scalar fields to return plus
/// relation expansions. Consumed opaquely by the execution service.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectionPlan {
    pub entity: String,
    pub fields: Vec<String>,
    pub relations: Vec<RelationSelection>,
}

impl SelectionPlan {
    /// Default selection: every scalar field, no relations.
    #[must_use]
    pub fn all_scalars(model: &EntityModel) -> Self {
        Self {
            entity: model.entity_name.to_string(),
            fields: model
                .fields
                .iter()
                .map(|field| field.name.to_string())
                .collect(),
            relations: Vec::new(),
        }
    }
}

/// Resolve a selection input into a plan, enforcing mode exclusivity, the
/// depth limit, and the cycle guard. The resolver never executes anything.
pub fn resolve(
    registry: &SchemaRegistry,
    model: &EntityModel,
    input: &SelectionInput,
    limits: SelectionLimits,
) -> Result<SelectionPlan, SelectionError> {
    let mut visited = Vec::new();
    resolve_level(registry, model, input, limits, 0, &mut visited)
}

fn resolve_level(
    registry: &SchemaRegistry,
    model: &EntityModel,
    input: &SelectionInput,
    limits: SelectionLimits,
    depth: usize,
    visited: &mut Vec<(&'static str, &'static str)>,
) -> Result<SelectionPlan, SelectionError> {
    match (&input.select, &input.include) {
        (Some(_), Some(_)) => Err(SelectionError::AmbiguousSelection {
            entity: model.entity_name.to_string(),
        }),
        (Some(picks), None) => {
            resolve_select(registry, model, picks, limits, depth, visited)
        }
        (None, Some(picks)) => {
            resolve_include(registry, model, picks, limits, depth, visited)
        }
        (None, None) => Ok(SelectionPlan::all_scalars(model)),
    }
}

// Explicit select: only the named scalars plus the named relations.
fn resolve_select(
    registry: &SchemaRegistry,
    model: &EntityModel,
    picks: &[FieldPick],
    limits: SelectionLimits,
    depth: usize,
    visited: &mut Vec<(&'static str, &'static str)>,
) -> Result<SelectionPlan, SelectionError> {
    let mut fields = Vec::new();
    let mut relations = Vec::new();

    for pick in picks {
        match pick {
            FieldPick::Scalar(name) => {
                if model.field(name).is_none() {
                    return Err(SelectionError::UnknownField {
                        entity: model.entity_name.to_string(),
                        field: name.clone(),
                    });
                }
                fields.push(name.clone());
            }
            FieldPick::Relation(relation_pick) => {
                relations.push(resolve_relation(
                    registry,
                    model,
                    relation_pick,
                    limits,
                    depth,
                    visited,
                )?);
            }
        }
    }

    Ok(SelectionPlan {
        entity: model.entity_name.to_string(),
        fields,
        relations,
    })
}

// Include: all scalars plus the named relations.
fn resolve_include(
    registry: &SchemaRegistry,
    model: &EntityModel,
    picks: &[RelationPick],
    limits: SelectionLimits,
    depth: usize,
    visited: &mut Vec<(&'static str, &'static str)>,
) -> Result<SelectionPlan, SelectionError> {
    let mut plan = SelectionPlan::all_scalars(model);

    for pick in picks {
        plan.relations.push(resolve_relation(
            registry, model, pick, limits, depth, visited,
        )?);
    }

    Ok(plan)
}

fn resolve_relation(
    registry: &SchemaRegistry,
    model: &EntityModel,
    pick: &RelationPick,
    limits: SelectionLimits,
    depth: usize,
    visited: &mut Vec<(&'static str, &'static str)>,
) -> Result<RelationSelection, SelectionError> {
    let Some(relation) = model.relation(&pick.relation) else {
        return Err(SelectionError::UnknownRelation {
            entity: model.entity_name.to_string(),
            relation: pick.relation.clone(),
        });
    };

    if pick.count_only {
        // Terminal node: no expansion, no traversal accounting.
        return Ok(RelationSelection {
            relation: relation.name.to_string(),
            target: relation.target.to_string(),
            kind: RelationSelectionKind::Count,
        });
    }

    let next_depth = depth + 1;
    if next_depth > limits.max_depth {
        return Err(SelectionError::DepthExceeded {
            max_depth: limits.max_depth,
        });
    }

    let edge = (model.entity_name, relation.name);
    if visited.contains(&edge) {
        return Err(SelectionError::CyclicInclude {
            entity: model.entity_name.to_string(),
            relation: relation.name.to_string(),
        });
    }

    let target = registry
        .entity(relation.target)
        .map_err(|_| SelectionError::UnknownRelation {
            entity: model.entity_name.to_string(),
            relation: pick.relation.clone(),
        })?;

    visited.push(edge);
    let nested_input = pick.nested.clone().unwrap_or_default();
    let nested = resolve_level(registry, target, &nested_input, limits, next_depth, visited)?;
    visited.pop();

    Ok(RelationSelection {
        relation: relation.name.to_string(),
        target: relation.target.to_string(),
        kind: RelationSelectionKind::Expand(Box::new(nested)),
    })
}

///
/// TESTS
///
