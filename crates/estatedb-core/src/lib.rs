//! Core runtime for estatedb: entity metadata, predicate/selection/aggregate
//! planners, mutation planning, pagination, transaction coordination, and
//! the execution-service seam.
//!
//! Everything here is synchronous and side-effect-free until a finished plan
//! crosses `service::ExecutionService`. Plans are independent immutable
//! values; building them requires no locking and never touches storage.

pub mod error;
pub mod model;
pub mod mutation;
pub mod obs;
pub mod plan;
pub mod query;
pub mod response;
pub mod service;
pub mod session;
pub mod traits;
pub mod transaction;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, PlanError};

///
/// Prelude
///
/// Prelude contains only domain vocabulary used by typical caller code.
/// Executors, sinks, and low-level helpers stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        error::{Error, PlanError},
        model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel, SchemaRegistry},
        mutation::{RelationWrite, UpsertBuilder, WriteInput},
        query::{
            FindQuery,
            aggregate::{
                AggregateKind, AggregateQuery, AggregateSelection, GroupByQuery, HavingExpr,
                HavingTarget,
            },
            page::{Cursor, OrderKey, OrderSpec, PageSpec},
            predicate::{FieldRef, Predicate, RelationRef},
            select::{FieldPick, RelationPick, SelectionInput, SelectionLimits},
            unique::UniqueSelector,
        },
        response::{Row, Rows},
        service::{ExecutionService, IsolationLevel},
        session::{Db, EntityClient},
        traits::{EntityKind, FieldValue as _},
        transaction::{TransactionOptions, TxState},
        value::{Float64, Value, ValueEnum},
    };
}
