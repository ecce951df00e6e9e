//! Transaction coordination: sequential plan lists and interactive scopes.
//!
//! The coordinator owns the client-side state machine
//! `Pending → Active → {Committed, Aborted}` and the `max_wait`/`timeout`
//! deadlines. Atomicity and rollback of work already submitted belong to the
//! execution service; this layer only decides *when* to commit or roll back.

use crate::{
    error::Error,
    obs::{MetricsEvent, record},
    plan::Plan,
    response::Rows,
    service::{ExecutionError, ExecutionService, IsolationLevel, TransactionId},
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use thiserror::Error as ThisError;

///
/// AbortCause
/// The originating error carried by a terminal `Aborted` state.
///

#[derive(Debug, ThisError)]
pub enum AbortCause {
    #[error("transaction timed out after {elapsed_ms}ms (limit {limit_ms}ms)")]
    TransactionTimeout { elapsed_ms: u64, limit_ms: u64 },

    #[error("transaction acquisition exceeded max_wait ({elapsed_ms}ms > {limit_ms}ms)")]
    MaxWaitExceeded { elapsed_ms: u64, limit_ms: u64 },

    #[error(transparent)]
    Execution(ExecutionError),

    #[error("aborted by caller: {reason}")]
    Requested { reason: String },
}

impl AbortCause {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TransactionTimeout { .. })
    }
}

///
/// TransactionError
///

#[derive(Debug, ThisError)]
pub enum TransactionError {
    /// Terminal abort; there is no partial-commit state.
    #[error("transaction aborted: {cause}")]
    TransactionAborted { cause: AbortCause },
}

impl TransactionError {
    #[must_use]
    pub const fn aborted(cause: AbortCause) -> Self {
        Self::TransactionAborted { cause }
    }
}

///
/// TxState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxState {
    /// Acquired from the service but not yet released to the caller body.
    Pending,
    Active,
    Committed,
    Aborted,
}

///
/// TransactionOptions
///

#[derive(Clone, Copy, Debug)]
pub struct TransactionOptions {
    /// Time allowed to acquire the transaction from the service.
    pub max_wait: Duration,
    /// Time allowed for the whole interactive body, submissions included.
    pub timeout: Duration,
    /// Plan metadata only; enforcement is the execution service's concern.
    pub isolation: Option<IsolationLevel>,
}

impl TransactionOptions {
    #[must_use]
    pub const fn new(max_wait: Duration, timeout: Duration) -> Self {
        Self {
            max_wait,
            timeout,
            isolation: None,
        }
    }

    #[must_use]
    pub const fn isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = Some(isolation);
        self
    }
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(5))
    }
}

///
/// InteractiveTransaction
///
/// Transaction-scoped planner handle. Single-owner for its lifetime: every
/// submission takes `&mut self`, and the handle never escapes the body
/// closure.
///

pub struct InteractiveTransaction<'a> {
    service: &'a dyn ExecutionService,
    id: TransactionId,
    state: TxState,
    deadline: Instant,
    timeout: Duration,
    started: Instant,
}

impl<'a> InteractiveTransaction<'a> {
    fn new(service: &'a dyn ExecutionService, id: TransactionId, timeout: Duration) -> Self {
        let now = Instant::now();
        Self {
            service,
            id,
            state: TxState::Pending,
            deadline: now + timeout,
            timeout,
            started: now,
        }
    }

    // Pending → Active; restarts the timeout window at body entry.
    fn activate(&mut self) {
        let now = Instant::now();
        self.started = now;
        self.deadline = now + self.timeout;
        self.state = TxState::Active;
    }

    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    #[must_use]
    pub const fn state(&self) -> TxState {
        self.state
    }

    /// Submit one plan inside the open transaction.
    ///
    /// Re-checks the body deadline before touching the service; a timed-out
    /// handle aborts here rather than sending more work.
    pub fn submit(&mut self, plan: &Plan) -> Result<Rows, Error> {
        self.ensure_deadline()?;

        match self.service.execute_in(self.id, plan) {
            Ok(rows) => Ok(rows),
            Err(err) => {
                self.state = TxState::Aborted;
                Err(TransactionError::aborted(AbortCause::Execution(err)).into())
            }
        }
    }

    /// Mark the transaction aborted by caller decision. Returns the error to
    /// bubble out of the body.
    pub fn abort(&mut self, reason: impl Into<String>) -> TransactionError {
        self.state = TxState::Aborted;
        TransactionError::aborted(AbortCause::Requested {
            reason: reason.into(),
        })
    }

    fn ensure_deadline(&mut self) -> Result<(), Error> {
        if self.state != TxState::Active {
            return Err(TransactionError::aborted(AbortCause::Requested {
                reason: format!("transaction handle is no longer active ({:?})", self.state),
            })
            .into());
        }

        if Instant::now() > self.deadline {
            self.state = TxState::Aborted;
            return Err(TransactionError::aborted(self.timeout_cause()).into());
        }

        Ok(())
    }

    fn expired(&self) -> bool {
        Instant::now() > self.deadline
    }

    #[expect(clippy::cast_possible_truncation)]
    fn timeout_cause(&self) -> AbortCause {
        AbortCause::TransactionTimeout {
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            limit_ms: self.timeout.as_millis() as u64,
        }
    }
}

///
/// Coordinator
///

pub struct Coordinator {
    service: Arc<dyn ExecutionService>,
}

impl Coordinator {
    #[must_use]
    pub fn new(service: Arc<dyn ExecutionService>) -> Self {
        Self { service }
    }

    /// Submit an ordered list of independently built plans as one atomic
    /// unit. Ordering equals list order; isolation is metadata passed
    /// through to the service.
    pub fn sequential(
        &self,
        plans: &[Plan],
        isolation: Option<IsolationLevel>,
    ) -> Result<Vec<Rows>, TransactionError> {
        record(MetricsEvent::TxBegin);

        match self.service.execute_transaction(plans, isolation) {
            Ok(results) => {
                record(MetricsEvent::TxCommit);
                Ok(results)
            }
            Err(err) => {
                record(MetricsEvent::TxAbort);
                Err(TransactionError::aborted(AbortCause::Execution(err)))
            }
        }
    }

    /// Run a caller-supplied body against a transaction-scoped handle.
    ///
    /// Acquisition must complete within `max_wait`; the body (including its
    /// submissions and the final commit) must complete within `timeout`.
    /// Either bound aborts the transaction, triggers service-side rollback,
    /// and surfaces the terminal `TransactionAborted` error.
    pub fn interactive<T>(
        &self,
        options: TransactionOptions,
        body: impl FnOnce(&mut InteractiveTransaction<'_>) -> Result<T, Error>,
    ) -> Result<T, TransactionError> {
        record(MetricsEvent::TxBegin);

        let acquire_start = Instant::now();
        let id = match self.service.begin(options.isolation) {
            Ok(id) => id,
            Err(err) => {
                record(MetricsEvent::TxAbort);
                return Err(TransactionError::aborted(AbortCause::Execution(err)));
            }
        };

        let mut tx = InteractiveTransaction::new(self.service.as_ref(), id, options.timeout);

        let acquire_elapsed = acquire_start.elapsed();
        if acquire_elapsed > options.max_wait {
            return self.roll_back(id, max_wait_cause(acquire_elapsed, options.max_wait));
        }
        tx.activate();

        match body(&mut tx) {
            Ok(value) => {
                if tx.state == TxState::Aborted {
                    return self.roll_back(
                        id,
                        AbortCause::Requested {
                            reason: "body aborted the handle but returned success".to_string(),
                        },
                    );
                }
                if tx.expired() {
                    return self.roll_back(id, tx.timeout_cause());
                }

                match self.service.commit(id) {
                    Ok(()) => {
                        tx.state = TxState::Committed;
                        record(MetricsEvent::TxCommit);
                        Ok(value)
                    }
                    Err(err) => {
                        record(MetricsEvent::TxAbort);
                        Err(TransactionError::aborted(AbortCause::Execution(err)))
                    }
                }
            }
            Err(err) => self.roll_back(id, abort_cause_from(err)),
        }
    }

    // Best-effort service rollback, then the terminal abort error.
    fn roll_back<T>(&self, id: TransactionId, cause: AbortCause) -> Result<T, TransactionError> {
        let _ = self.service.rollback(id);
        record(MetricsEvent::TxAbort);

        Err(TransactionError::aborted(cause))
    }
}

#[expect(clippy::cast_possible_truncation)]
fn max_wait_cause(elapsed: Duration, limit: Duration) -> AbortCause {
    AbortCause::MaxWaitExceeded {
        elapsed_ms: elapsed.as_millis() as u64,
        limit_ms: limit.as_millis() as u64,
    }
}

// Collapse a body failure into the abort cause it originated from.
fn abort_cause_from(err: Error) -> AbortCause {
    match err {
        Error::Transaction(TransactionError::TransactionAborted { cause }) => cause,
        Error::Execution(exec) => AbortCause::Execution(exec),
        other => AbortCause::Requested {
            reason: other.to_string(),
        },
    }
}

///
/// TESTS
///
