//! Metrics sink boundary.
//!
//! Planning and session logic MUST NOT depend on `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`; this
//! module is the only bridge between that logic and the counter state.

use crate::obs::metrics;
use std::cell::RefCell;

///
/// PlanKind
///

#[derive(Clone, Copy, Debug)]
pub enum PlanKind {
    Query,
    Aggregate,
    GroupBy,
    Mutation,
    Transaction,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    PlanBuilt {
        kind: PlanKind,
        entity: &'static str,
    },
    PlanRejected {
        kind: PlanKind,
        entity: &'static str,
    },
    Execution {
        entity: &'static str,
        rows_returned: u64,
    },
    BatchExecution {
        entity: &'static str,
        affected: u64,
    },
    TxBegin,
    TxCommit,
    TxAbort,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
/// Default sink that writes into thread-local counter state. Acts as the
/// concrete sink when no scoped override is installed.
///

struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|state| match event {
            MetricsEvent::PlanBuilt { .. } => state.plans_built += 1,
            MetricsEvent::PlanRejected { .. } => state.plans_rejected += 1,
            MetricsEvent::Execution { rows_returned, .. } => {
                state.executions += 1;
                state.rows_returned += rows_returned;
            }
            MetricsEvent::BatchExecution { .. } => state.batch_executions += 1,
            MetricsEvent::TxBegin => state.tx_begun += 1,
            MetricsEvent::TxCommit => state.tx_committed += 1,
            MetricsEvent::TxAbort => state.tx_aborted += 1,
        });
    }
}

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = const { RefCell::new(None) };
}

/// Record one event through the active sink.
pub fn record(event: MetricsEvent) {
    let handled = SINK_OVERRIDE.with(|cell| {
        if let Some(ptr) = *cell.borrow() {
            // SAFETY: the pointer is installed and cleared by
            // `with_sink_override`, which keeps the sink alive for the whole
            // closure scope on this thread.
            unsafe { (*ptr).record(event) };
            return true;
        }
        false
    });

    if !handled {
        GlobalMetricsSink.record(event);
    }
}

/// Run `f` with a scoped sink override on this thread; used by tests that
/// want to observe events without touching global counters.
pub fn with_sink_override<R>(sink: &dyn MetricsSink, f: impl FnOnce() -> R) -> R {
    SINK_OVERRIDE.with(|cell| {
        // SAFETY: erase the borrow's lifetime to store the raw pointer; it is
        // cleared below before `sink` can dangle, keeping the sink alive for
        // the whole closure scope on this thread.
        let erased: *const (dyn MetricsSink + 'static) =
            unsafe { std::mem::transmute(std::ptr::from_ref(sink)) };
        *cell.borrow_mut() = Some(erased);
    });
    let result = f();
    SINK_OVERRIDE.with(|cell| {
        *cell.borrow_mut() = None;
    });

    result
}

///
/// TESTS
///
