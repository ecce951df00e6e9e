//! Transaction coordination against the stub service: all-or-nothing
//! sequencing and interactive deadline enforcement.

mod common;

use common::StubService;
use estatedb::prelude::*;
use estatedb::core::{
    mutation::{plan_delete, plan_update},
    plan::Plan,
    transaction::{AbortCause, TransactionError, TransactionOptions},
};
use std::{sync::Arc, thread, time::Duration};

fn session() -> (Arc<StubService>, Db) {
    let service = Arc::new(StubService::default());
    let registry = Arc::new(registry().expect("CRM schema builds"));
    let db = Db::new(registry, service.clone());

    (service, db)
}

fn reserve_apartment(db: &Db, apartment_id: i64, client_id: i64) -> Plan {
    let plan = plan_update(
        db.registry(),
        Apartment::MODEL,
        UniqueSelector::new("id", apartment_id),
        WriteInput::new()
            .set("status", ApartmentStatus::Reserved)
            .set("client_id", client_id),
    )
    .expect("valid update");

    Plan::Mutation(plan)
}

fn delete_comment(db: &Db, comment_id: i64) -> Plan {
    let plan = plan_delete(
        db.registry().entity("Comment").expect("registered"),
        UniqueSelector::new("id", comment_id),
    )
    .expect("valid delete");

    Plan::Mutation(plan)
}

#[test]
fn sequential_transactions_apply_in_list_order() {
    let (service, db) = session();
    let coordinator = db.transactions();

    let plans = vec![
        reserve_apartment(&db, 7, 3),
        delete_comment(&db, 9),
    ];
    let results = coordinator
        .sequential(&plans, Some(IsolationLevel::Serializable))
        .expect("commits");

    assert_eq!(results.len(), 2);
    let committed = service.committed.borrow();
    assert_eq!(*committed, plans);
}

#[test]
fn interactive_bodies_commit_their_submissions() {
    let (service, db) = session();
    let coordinator = db.transactions();

    let reserved = reserve_apartment(&db, 7, 3);
    let outcome = coordinator
        .interactive(TransactionOptions::default(), |tx| {
            tx.submit(&reserved)?;
            Ok("reserved")
        })
        .expect("commits");

    assert_eq!(outcome, "reserved");
    assert_eq!(service.committed.borrow().len(), 1);
    assert!(service.staged.borrow().is_empty());
}

#[test]
fn timed_out_bodies_abort_with_timeout_cause_and_no_partial_writes() {
    let (service, db) = session();
    let coordinator = db.transactions();

    let reserved = reserve_apartment(&db, 7, 3);
    let options = TransactionOptions::new(Duration::from_secs(1), Duration::from_millis(25));

    let result: Result<(), _> = coordinator.interactive(options, |tx| {
        tx.submit(&reserved)?;
        thread::sleep(Duration::from_millis(80));
        Ok(())
    });

    assert!(matches!(
        result,
        Err(TransactionError::TransactionAborted { cause: AbortCause::TransactionTimeout { .. } })
    ));
    // the staged write was rolled back; nothing is visible
    assert!(service.committed.borrow().is_empty());
    assert!(service.staged.borrow().is_empty());
}

#[test]
fn caller_aborts_roll_back_everything() {
    let (service, db) = session();
    let coordinator = db.transactions();

    let reserved = reserve_apartment(&db, 7, 3);
    let result: Result<(), _> = coordinator.interactive(TransactionOptions::default(), |tx| {
        tx.submit(&reserved)?;
        Err(tx.abort("client withdrew the offer").into())
    });

    assert!(matches!(
        result,
        Err(TransactionError::TransactionAborted {
            cause: AbortCause::Requested { reason }
        }) if reason == "client withdrew the offer"
    ));
    assert!(service.committed.borrow().is_empty());
    assert!(service.staged.borrow().is_empty());
}
