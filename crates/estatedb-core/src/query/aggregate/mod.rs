//! Aggregate and group-by planning.
//!
//! The single most load-bearing rule lives here: every plain field referenced
//! inside `having`, after flattening through all boolean combinators, must
//! be a member of the group-by key set. Aggregate pseudo-fields (`_count`,
//! `_avg`, ...) are exempt but type-checked against their target fields.

mod intent;

pub use intent::{AggregateQuery, GroupByQuery};

use crate::{
    model::EntityModel,
    query::{
        page::{OrderSpec, PageSpec},
        predicate::CompareOp,
    },
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// AggregateKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AggregateKind {
    Count,
    Avg,
    Sum,
    Min,
    Max,
}

impl AggregateKind {
    /// Wire spelling of the aggregate pseudo-field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "_count",
            Self::Avg => "_avg",
            Self::Sum => "_sum",
            Self::Min => "_min",
            Self::Max => "_max",
        }
    }

    /// Avg/Sum are only meaningful over numeric fields.
    #[must_use]
    pub const fn requires_numeric(self) -> bool {
        matches!(self, Self::Avg | Self::Sum)
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// AggregateSelection
///
/// The `_count/_avg/_sum/_min/_max` surface of an aggregate or group-by
/// plan, each scoped to a field subset.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AggregateSelection {
    /// `None` = no count; `Some(empty)` = count all rows.
    pub count: Option<Vec<String>>,
    pub avg: Vec<String>,
    pub sum: Vec<String>,
    pub min: Vec<String>,
    pub max: Vec<String>,
}

impl AggregateSelection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: None,
            avg: Vec::new(),
            sum: Vec::new(),
            min: Vec::new(),
            max: Vec::new(),
        }
    }

    #[must_use]
    pub fn count_all(mut self) -> Self {
        self.count = Some(Vec::new());
        self
    }

    #[must_use]
    pub fn count_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.count = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn avg(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.avg = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn sum(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sum = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn min(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.min = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn max(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.max = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count.is_none()
            && self.avg.is_empty()
            && self.sum.is_empty()
            && self.min.is_empty()
            && self.max.is_empty()
    }

    fn scoped(&self) -> impl Iterator<Item = (AggregateKind, &String)> {
        let count = self
            .count
            .iter()
            .flatten()
            .map(|f| (AggregateKind::Count, f));
        count
            .chain(self.avg.iter().map(|f| (AggregateKind::Avg, f)))
            .chain(self.sum.iter().map(|f| (AggregateKind::Sum, f)))
            .chain(self.min.iter().map(|f| (AggregateKind::Min, f)))
            .chain(self.max.iter().map(|f| (AggregateKind::Max, f)))
    }
}

///
/// HavingTarget
/// What one having comparison addresses: a group-by key field or an
/// aggregate pseudo-field.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HavingTarget {
    Field(String),
    Aggregate {
        kind: AggregateKind,
        /// `None` only for `_count` over whole buckets.
        field: Option<String>,
    },
}

impl HavingTarget {
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    #[must_use]
    pub fn aggregate(kind: AggregateKind, field: impl Into<String>) -> Self {
        Self::Aggregate {
            kind,
            field: Some(field.into()),
        }
    }

    #[must_use]
    pub const fn count_all() -> Self {
        Self::Aggregate {
            kind: AggregateKind::Count,
            field: None,
        }
    }
}

///
/// HavingExpr
/// Boolean tree over bucket-level comparisons.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HavingExpr {
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare {
        target: HavingTarget,
        op: CompareOp,
        value: Value,
    },
}

impl HavingExpr {
    #[must_use]
    pub fn compare(target: HavingTarget, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            target,
            op,
            value: value.into(),
        }
    }
}

///
/// AggregateError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum AggregateError {
    #[error("group-by requires a non-empty `by` field list")]
    ByEmpty,

    #[error("aggregate requires at least one aggregate selection")]
    EmptyAggregates,

    #[error("unknown field '{field}' in {clause}")]
    UnknownField { field: String, clause: &'static str },

    #[error("{kind} is not valid for non-numeric field '{field}'")]
    AggregateTypeMismatch { kind: AggregateKind, field: String },

    #[error("having references field '{field}' which is not in the group-by key set")]
    HavingFieldNotInGroupBy { field: String },

    #[error("order field '{field}' is not in the group-by key set")]
    OrderFieldNotInGroupBy { field: String },

    #[error("take/skip on a group-by requires an explicit order_by")]
    MissingOrderBy,
}

/// Validate an aggregate selection against the entity schema.
///
/// Numeric aggregates are only valid on numeric fields; min/max additionally
/// require orderability.
pub fn validate_aggregate_selection(
    model: &EntityModel,
    selection: &AggregateSelection,
) -> Result<(), AggregateError> {
    for (kind, field) in selection.scoped() {
        let field_model =
            model
                .field(field)
                .ok_or_else(|| AggregateError::UnknownField {
                    field: field.clone(),
                    clause: "aggregate",
                })?;

        let acceptable = match kind {
            AggregateKind::Count => true,
            AggregateKind::Avg | AggregateKind::Sum => field_model.kind.is_numeric(),
            AggregateKind::Min | AggregateKind::Max => field_model.kind.is_orderable(),
        };
        if !acceptable {
            return Err(AggregateError::AggregateTypeMismatch {
                kind,
                field: field.clone(),
            });
        }
    }

    Ok(())
}

/// Validate a group-by shape: non-empty known `by` keys, having membership,
/// and the order/window coupling rules.
pub fn validate_group_by(
    model: &EntityModel,
    by: &[String],
    aggregates: &AggregateSelection,
    having: Option<&HavingExpr>,
    order: Option<&OrderSpec>,
    page: Option<&PageSpec>,
) -> Result<(), AggregateError> {
    if by.is_empty() {
        return Err(AggregateError::ByEmpty);
    }
    for field in by {
        if model.field(field).is_none() {
            return Err(AggregateError::UnknownField {
                field: field.clone(),
                clause: "by",
            });
        }
    }

    validate_aggregate_selection(model, aggregates)?;

    if let Some(having) = having {
        validate_having(model, by, having)?;
    }

    // A window without a total order over buckets is non-deterministic.
    let windowed = page.is_some_and(PageSpec::is_windowed);
    match order {
        Some(order) => {
            for key in &order.keys {
                if !by.contains(&key.field) {
                    return Err(AggregateError::OrderFieldNotInGroupBy {
                        field: key.field.clone(),
                    });
                }
            }
        }
        None if windowed => return Err(AggregateError::MissingOrderBy),
        None => {}
    }

    Ok(())
}

// Recursive membership check: flattens through every boolean combinator
// before testing field membership, so nesting depth never hides a violation.
fn validate_having(
    model: &EntityModel,
    by: &[String],
    having: &HavingExpr,
) -> Result<(), AggregateError> {
    match having {
        HavingExpr::And(children) | HavingExpr::Or(children) => {
            for child in children {
                validate_having(model, by, child)?;
            }
            Ok(())
        }
        HavingExpr::Not(inner) => validate_having(model, by, inner),
        HavingExpr::Compare { target, .. } => validate_having_target(model, by, target),
    }
}

fn validate_having_target(
    model: &EntityModel,
    by: &[String],
    target: &HavingTarget,
) -> Result<(), AggregateError> {
    match target {
        HavingTarget::Field(field) => {
            if model.field(field).is_none() {
                return Err(AggregateError::UnknownField {
                    field: field.clone(),
                    clause: "having",
                });
            }
            if !by.contains(field) {
                return Err(AggregateError::HavingFieldNotInGroupBy {
                    field: field.clone(),
                });
            }
            Ok(())
        }
        HavingTarget::Aggregate { kind, field } => {
            let Some(field) = field else {
                // bucket-level _count has no field to check
                return Ok(());
            };
            let field_model =
                model
                    .field(field)
                    .ok_or_else(|| AggregateError::UnknownField {
                        field: field.clone(),
                        clause: "having",
                    })?;
            if kind.requires_numeric() && !field_model.kind.is_numeric() {
                return Err(AggregateError::AggregateTypeMismatch {
                    kind: *kind,
                    field: field.clone(),
                });
            }
            Ok(())
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{
        AggregateError, AggregateKind, AggregateSelection, HavingExpr, HavingTarget,
        validate_aggregate_selection, validate_group_by,
    };
    use crate::{
        query::{
            page::{OrderKey, OrderSpec, PageSpec},
            predicate::CompareOp,
        },
        test_support::STAGE_MODEL,
        value::Value,
    };

    fn by(fields: &[&str]) -> Vec<String> {
        fields.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn numeric_aggregates_reject_non_numeric_fields() {
        let selection = AggregateSelection::new().avg(["name"]);

        assert!(matches!(
            validate_aggregate_selection(&STAGE_MODEL, &selection),
            Err(AggregateError::AggregateTypeMismatch { kind: AggregateKind::Avg, field })
                if field == "name"
        ));
    }

    #[test]
    fn min_max_accept_any_orderable_field() {
        let selection = AggregateSelection::new()
            .min(["created_at", "name"])
            .max(["target"]);

        assert!(validate_aggregate_selection(&STAGE_MODEL, &selection).is_ok());
    }

    #[test]
    fn count_accepts_all_rows_and_field_scopes() {
        let all = AggregateSelection::new().count_all();
        assert!(validate_aggregate_selection(&STAGE_MODEL, &all).is_ok());

        let scoped = AggregateSelection::new().count_fields(["notes"]);
        assert!(validate_aggregate_selection(&STAGE_MODEL, &scoped).is_ok());
    }

    #[test]
    fn group_by_requires_non_empty_by() {
        let result = validate_group_by(
            &STAGE_MODEL,
            &[],
            &AggregateSelection::new().count_all(),
            None,
            None,
            None,
        );

        assert!(matches!(result, Err(AggregateError::ByEmpty)));
    }

    #[test]
    fn having_on_field_outside_by_names_the_offender() {
        // group by status, filter buckets by target: target is not a key.
        let having = HavingExpr::compare(
            HavingTarget::field("target"),
            CompareOp::Gt,
            Value::Int(100),
        );

        let result = validate_group_by(
            &STAGE_MODEL,
            &by(&["status"]),
            &AggregateSelection::new().count_all(),
            Some(&having),
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(AggregateError::HavingFieldNotInGroupBy { field }) if field == "target"
        ));
    }

    #[test]
    fn having_violations_surface_through_nested_combinators() {
        // OR [ AND [ ok, NOT(violation) ] ], depth 3 around the offender.
        let ok = HavingExpr::compare(
            HavingTarget::field("status"),
            CompareOp::Eq,
            Value::Enum(crate::value::ValueEnum::new("WON")),
        );
        let violation = HavingExpr::compare(
            HavingTarget::field("target"),
            CompareOp::Gte,
            Value::Int(5),
        );
        let nested = HavingExpr::Or(vec![HavingExpr::And(vec![
            ok,
            HavingExpr::Not(Box::new(violation)),
        ])]);

        let result = validate_group_by(
            &STAGE_MODEL,
            &by(&["status"]),
            &AggregateSelection::new().count_all(),
            Some(&nested),
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(AggregateError::HavingFieldNotInGroupBy { field }) if field == "target"
        ));
    }

    #[test]
    fn aggregate_pseudo_fields_are_exempt_from_membership() {
        let having = HavingExpr::And(vec![
            HavingExpr::compare(HavingTarget::count_all(), CompareOp::Gt, Value::Int(2)),
            HavingExpr::compare(
                HavingTarget::aggregate(AggregateKind::Avg, "target"),
                CompareOp::Gte,
                Value::Int(1000),
            ),
        ]);

        let result = validate_group_by(
            &STAGE_MODEL,
            &by(&["status"]),
            &AggregateSelection::new().count_all(),
            Some(&having),
            None,
            None,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn having_aggregates_type_check_their_targets() {
        let having = HavingExpr::compare(
            HavingTarget::aggregate(AggregateKind::Sum, "name"),
            CompareOp::Gt,
            Value::Int(1),
        );

        let result = validate_group_by(
            &STAGE_MODEL,
            &by(&["status"]),
            &AggregateSelection::new().count_all(),
            Some(&having),
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(AggregateError::AggregateTypeMismatch { kind: AggregateKind::Sum, field })
                if field == "name"
        ));
    }

    #[test]
    fn windowed_group_by_without_order_is_rejected() {
        let page = PageSpec::take(10);

        let result = validate_group_by(
            &STAGE_MODEL,
            &by(&["status"]),
            &AggregateSelection::new().count_all(),
            None,
            None,
            Some(&page),
        );

        assert!(matches!(result, Err(AggregateError::MissingOrderBy)));
    }

    #[test]
    fn group_by_order_fields_must_be_keys() {
        let order = OrderSpec::new(vec![OrderKey::asc("target")]);
        let page = PageSpec::take(10);

        let result = validate_group_by(
            &STAGE_MODEL,
            &by(&["status"]),
            &AggregateSelection::new().count_all(),
            None,
            Some(&order),
            Some(&page),
        );

        assert!(matches!(
            result,
            Err(AggregateError::OrderFieldNotInGroupBy { field }) if field == "target"
        ));
    }

    #[test]
    fn ordered_window_over_keys_is_accepted() {
        let order = OrderSpec::new(vec![OrderKey::asc("status")]);
        let page = PageSpec::new(5, Some(10));

        let result = validate_group_by(
            &STAGE_MODEL,
            &by(&["status"]),
            &AggregateSelection::new().count_all().avg(["target"]),
            None,
            Some(&order),
            Some(&page),
        );

        assert!(result.is_ok());
    }
}
