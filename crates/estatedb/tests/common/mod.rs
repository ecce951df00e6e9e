//! Shared stub execution service for integration tests.
//!
//! Plans submitted through open transactions stay staged until commit;
//! rollback discards them. Tests assert on the call log to prove planner
//! rejections never reach the service.

use estatedb::core::{
    plan::Plan,
    response::Rows,
    service::{ExecutionError, ExecutionService, IsolationLevel, TransactionId},
};
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
};

#[derive(Default)]
pub struct StubService {
    pub executed: RefCell<Vec<Plan>>,
    pub batch_executed: RefCell<Vec<Plan>>,
    pub canned_rows: RefCell<VecDeque<Rows>>,
    pub batch_result: Cell<u64>,
    pub committed: RefCell<Vec<Plan>>,
    pub staged: RefCell<BTreeMap<u64, Vec<Plan>>>,
    next_tx: Cell<u64>,
}

impl StubService {
    pub fn queue_rows(&self, rows: Rows) {
        self.canned_rows.borrow_mut().push_back(rows);
    }

    pub fn total_call_count(&self) -> usize {
        self.executed.borrow().len() + self.batch_executed.borrow().len()
    }

    fn next_rows(&self) -> Rows {
        self.canned_rows
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(Rows::empty)
    }
}

impl ExecutionService for StubService {
    fn execute(&self, plan: &Plan) -> Result<Rows, ExecutionError> {
        self.executed.borrow_mut().push(plan.clone());

        Ok(self.next_rows())
    }

    fn execute_batch(&self, plan: &Plan) -> Result<u64, ExecutionError> {
        self.batch_executed.borrow_mut().push(plan.clone());

        Ok(self.batch_result.get())
    }

    fn execute_transaction(
        &self,
        plans: &[Plan],
        _isolation: Option<IsolationLevel>,
    ) -> Result<Vec<Rows>, ExecutionError> {
        self.committed.borrow_mut().extend_from_slice(plans);

        Ok(plans.iter().map(|_| self.next_rows()).collect())
    }

    fn begin(&self, _isolation: Option<IsolationLevel>) -> Result<TransactionId, ExecutionError> {
        let id = self.next_tx.get();
        self.next_tx.set(id + 1);
        self.staged.borrow_mut().insert(id, Vec::new());

        Ok(TransactionId(id))
    }

    fn execute_in(&self, tx: TransactionId, plan: &Plan) -> Result<Rows, ExecutionError> {
        self.staged
            .borrow_mut()
            .entry(tx.0)
            .or_default()
            .push(plan.clone());

        Ok(self.next_rows())
    }

    fn commit(&self, tx: TransactionId) -> Result<(), ExecutionError> {
        let Some(plans) = self.staged.borrow_mut().remove(&tx.0) else {
            return Err(ExecutionError::new(format!("unknown transaction {tx}")));
        };
        self.committed.borrow_mut().extend(plans);

        Ok(())
    }

    fn rollback(&self, tx: TransactionId) -> Result<(), ExecutionError> {
        self.staged.borrow_mut().remove(&tx.0);

        Ok(())
    }
}
