//! Execution service boundary.
//!
//! Plans cross this seam as opaque, fully-resolved data. The service owns
//! storage-level constraints (foreign keys, uniqueness) and transactional
//! atomicity; this layer never interprets or retries its failures.

use crate::{plan::Plan, response::Rows};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ExecutionError
/// Opaque pass-through failure from the execution service.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("execution failed: {message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// TransactionId
/// Service-issued handle for one open interactive transaction.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

///
/// IsolationLevel
/// Plan metadata only; enforcement belongs to the execution service.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum IsolationLevel {
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

///
/// ExecutionService
///
/// External collaborator executing resolved plans against the actual data
/// store. `execute` returns materialized rows; `execute_batch` returns the
/// affected-row count for batch mutations that do not request rows back.
///
/// The transactional surface backs the coordinator: `execute_transaction`
/// applies an ordered plan list all-or-nothing; `begin`/`execute_in`/
/// `commit`/`rollback` carry one interactive transaction. Rollback of work
/// already submitted is the service's obligation, not this layer's.
///

pub trait ExecutionService {
    fn execute(&self, plan: &Plan) -> Result<Rows, ExecutionError>;

    fn execute_batch(&self, plan: &Plan) -> Result<u64, ExecutionError>;

    fn execute_transaction(
        &self,
        plans: &[Plan],
        isolation: Option<IsolationLevel>,
    ) -> Result<Vec<Rows>, ExecutionError>;

    fn begin(&self, isolation: Option<IsolationLevel>) -> Result<TransactionId, ExecutionError>;

    fn execute_in(&self, tx: TransactionId, plan: &Plan) -> Result<Rows, ExecutionError>;

    fn commit(&self, tx: TransactionId) -> Result<(), ExecutionError>;

    fn rollback(&self, tx: TransactionId) -> Result<(), ExecutionError>;
}
