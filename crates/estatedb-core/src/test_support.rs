//! Test-only fixture schema: a two-entity pipeline (`Stage` owning many
//! `Sale` rows) exercising enums, floats, nullable fields, unique selectors,
//! and a mutually-referential relation pair.

use crate::{
    model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel, SchemaRegistry},
    plan::Plan,
    response::Rows,
    service::{ExecutionError, ExecutionService, IsolationLevel, TransactionId},
};
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
};

pub(crate) const STAGE_STATUS: &[&str] = &["OPEN", "WON", "LOST"];

pub(crate) static STAGE_FIELDS: [FieldModel; 6] = [
    FieldModel {
        name: "id",
        kind: FieldKind::Int,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "name",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "status",
        kind: FieldKind::Enum {
            values: STAGE_STATUS,
        },
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "target",
        kind: FieldKind::Float,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "created_at",
        kind: FieldKind::Timestamp,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "notes",
        kind: FieldKind::Text,
        nullable: true,
        unique: false,
    },
];

pub(crate) static STAGE_RELATIONS: [RelationModel; 1] = [RelationModel {
    name: "sales",
    target: "Sale",
    arity: RelationArity::Many,
    required: false,
    fk_field: None,
}];

pub(crate) static STAGE_MODEL: EntityModel = EntityModel {
    path: "test_support::Stage",
    entity_name: "Stage",
    primary_key: &STAGE_FIELDS[0],
    fields: &STAGE_FIELDS,
    relations: &STAGE_RELATIONS,
};

pub(crate) static SALE_FIELDS: [FieldModel; 5] = [
    FieldModel {
        name: "id",
        kind: FieldKind::Int,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "reference",
        kind: FieldKind::Text,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "amount",
        kind: FieldKind::Float,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "stage_id",
        kind: FieldKind::Int,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "closed",
        kind: FieldKind::Bool,
        nullable: false,
        unique: false,
    },
];

pub(crate) static SALE_RELATIONS: [RelationModel; 1] = [RelationModel {
    name: "stage",
    target: "Stage",
    arity: RelationArity::One,
    required: true,
    fk_field: Some("stage_id"),
}];

pub(crate) static SALE_MODEL: EntityModel = EntityModel {
    path: "test_support::Sale",
    entity_name: "Sale",
    primary_key: &SALE_FIELDS[0],
    fields: &SALE_FIELDS,
    relations: &SALE_RELATIONS,
};

/// Build a fresh fixture registry for one test.
pub(crate) fn registry() -> SchemaRegistry {
    SchemaRegistry::new(&[&STAGE_MODEL, &SALE_MODEL]).expect("fixture schema is valid")
}

///
/// RecordingService
///
/// Call-counting stub execution service. Plans submitted through open
/// transactions stay in `staged` until commit moves them to `committed`;
/// rollback discards them, so tests can assert "no partial writes visible"
/// and "no call was made" directly.
///

#[derive(Default)]
pub(crate) struct RecordingService {
    pub(crate) executed: RefCell<Vec<Plan>>,
    pub(crate) batch_executed: RefCell<Vec<Plan>>,
    pub(crate) canned_rows: RefCell<VecDeque<Rows>>,
    pub(crate) batch_result: Cell<u64>,
    pub(crate) committed: RefCell<Vec<Plan>>,
    pub(crate) staged: RefCell<BTreeMap<u64, Vec<Plan>>>,
    next_tx: Cell<u64>,
    pub(crate) fail_begin: Cell<bool>,
    pub(crate) fail_execute: Cell<bool>,
    pub(crate) fail_execute_in: Cell<bool>,
    pub(crate) fail_transaction: Cell<bool>,
}

impl RecordingService {
    pub(crate) fn queue_rows(&self, rows: Rows) {
        self.canned_rows.borrow_mut().push_back(rows);
    }

    pub(crate) fn execute_count(&self) -> usize {
        self.executed.borrow().len()
    }

    pub(crate) fn total_call_count(&self) -> usize {
        self.executed.borrow().len() + self.batch_executed.borrow().len()
    }

    pub(crate) fn staged_plan_count(&self) -> usize {
        self.staged.borrow().values().map(Vec::len).sum()
    }

    fn next_rows(&self) -> Rows {
        self.canned_rows
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(Rows::empty)
    }
}

impl ExecutionService for RecordingService {
    fn execute(&self, plan: &Plan) -> Result<Rows, ExecutionError> {
        if self.fail_execute.get() {
            return Err(ExecutionError::new("stub execute failure"));
        }
        self.executed.borrow_mut().push(plan.clone());

        Ok(self.next_rows())
    }

    fn execute_batch(&self, plan: &Plan) -> Result<u64, ExecutionError> {
        if self.fail_execute.get() {
            return Err(ExecutionError::new("stub execute failure"));
        }
        self.batch_executed.borrow_mut().push(plan.clone());

        Ok(self.batch_result.get())
    }

    fn execute_transaction(
        &self,
        plans: &[Plan],
        _isolation: Option<IsolationLevel>,
    ) -> Result<Vec<Rows>, ExecutionError> {
        if self.fail_transaction.get() {
            return Err(ExecutionError::new("stub transaction failure"));
        }
        self.committed.borrow_mut().extend_from_slice(plans);

        Ok(plans.iter().map(|_| self.next_rows()).collect())
    }

    fn begin(&self, _isolation: Option<IsolationLevel>) -> Result<TransactionId, ExecutionError> {
        if self.fail_begin.get() {
            return Err(ExecutionError::new("stub begin failure"));
        }
        let id = self.next_tx.get();
        self.next_tx.set(id + 1);
        self.staged.borrow_mut().insert(id, Vec::new());

        Ok(TransactionId(id))
    }

    fn execute_in(&self, tx: TransactionId, plan: &Plan) -> Result<Rows, ExecutionError> {
        if self.fail_execute_in.get() {
            return Err(ExecutionError::new("stub execute_in failure"));
        }
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
