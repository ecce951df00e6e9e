//! Immutable, fully-resolved plan values.
//!
//! A `Plan` is the only thing the execution service ever sees: validated,
//! self-contained data with no callbacks into the planning layer.

use crate::{
    mutation::MutationPlan,
    query::{
        aggregate::{AggregateSelection, HavingExpr},
        page::{Cursor, OrderSpec, PageSpec},
        predicate::Predicate,
        select::SelectionPlan,
        unique::UniqueSelector,
    },
};
use serde::{Deserialize, Serialize};

///
/// QueryMode
/// Read-cardinality intent carried into the plan.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryMode {
    Unique,
    First,
    Many,
}

///
/// QueryPlan
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct QueryPlan {
    pub entity: String,
    pub mode: QueryMode,
    /// Where-unique selector; present only in `Unique` mode.
    pub unique: Option<UniqueSelector>,
    pub filter: Option<Predicate>,
    pub selection: SelectionPlan,
    pub order: Option<OrderSpec>,
    pub page: Option<PageSpec>,
    pub cursor: Option<Cursor>,
}

///
/// AggregatePlan
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AggregatePlan {
    pub entity: String,
    pub filter: Option<Predicate>,
    pub aggregates: AggregateSelection,
    pub order: Option<OrderSpec>,
    pub page: Option<PageSpec>,
}

///
/// GroupByPlan
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GroupByPlan {
    pub entity: String,
    pub by: Vec<String>,
    pub filter: Option<Predicate>,
    pub aggregates: AggregateSelection,
    pub having: Option<HavingExpr>,
    pub order: Option<OrderSpec>,
    pub page: Option<PageSpec>,
}

///
/// Plan
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Plan {
    Query(QueryPlan),
    Aggregate(AggregatePlan),
    GroupBy(GroupByPlan),
    Mutation(MutationPlan),
}

impl Plan {
    /// Entity the plan addresses.
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::Query(plan) => &plan.entity,
            Self::Aggregate(plan) => &plan.entity,
            Self::GroupBy(plan) => &plan.entity,
            Self::Mutation(plan) => plan.entity(),
        }
    }

    /// True when the plan mutates rows.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation(_))
    }

    /// Stable label for observability counters.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Query(_) => "query",
            Self::Aggregate(_) => "aggregate",
            Self::GroupBy(_) => "group_by",
            Self::Mutation(_) => "mutation",
        }
    }
}

///
/// TESTS
///
