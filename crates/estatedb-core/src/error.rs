use crate::{
    model::RegistryError,
    mutation::MutationError,
    query::{
        aggregate::AggregateError, page::PageError, predicate::FilterError,
        select::SelectionError, unique::SelectorError,
    },
    response::ResponseError,
    service::ExecutionError,
    transaction::TransactionError,
};
use thiserror::Error as ThisError;

///
/// PlanError
///
/// Planner-owned validation failures. Every variant indicates a caller bug:
/// fail-fast, non-retryable, and raised before the execution service is
/// reached.
///

#[derive(Debug, ThisError)]
pub enum PlanError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Mutation(#[from] MutationError),
}

///
/// Error
/// Top-level error surface of the client layer.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Opaque execution-service failure, surfaced unchanged.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl From<FilterError> for Error {
    fn from(err: FilterError) -> Self {
        Self::Plan(err.into())
    }
}

impl From<SelectionError> for Error {
    fn from(err: SelectionError) -> Self {
        Self::Plan(err.into())
    }
}

impl From<SelectorError> for Error {
    fn from(err: SelectorError) -> Self {
        Self::Plan(err.into())
    }
}

impl From<AggregateError> for Error {
    fn from(err: AggregateError) -> Self {
        Self::Plan(err.into())
    }
}

impl From<PageError> for Error {
    fn from(err: PageError) -> Self {
        Self::Plan(err.into())
    }
}

impl From<MutationError> for Error {
    fn from(err: MutationError) -> Self {
        Self::Plan(err.into())
    }
}
