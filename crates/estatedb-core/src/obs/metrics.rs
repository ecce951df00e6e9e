use serde::Serialize;
use std::cell::RefCell;

///
/// EventReport
/// Ephemeral, in-memory counters for planning and execution activity.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    // Planner outcomes
    pub plans_built: u64,
    pub plans_rejected: u64,

    // Execution-service entrypoints
    pub executions: u64,
    pub batch_executions: u64,
    pub rows_returned: u64,

    // Transaction lifecycle
    pub tx_begun: u64,
    pub tx_committed: u64,
    pub tx_aborted: u64,
}

thread_local! {
    static STATE: RefCell<EventReport> = RefCell::new(EventReport::default());
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventReport) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Snapshot the current counter state.
#[must_use]
pub fn report() -> EventReport {
    STATE.with(|state| state.borrow().clone())
}

/// Reset all counters; used between test cases and reporting windows.
pub fn reset() {
    STATE.with(|state| *state.borrow_mut() = EventReport::default());
}
