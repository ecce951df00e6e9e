//! Observability: in-memory planning/execution counters behind a sink
//! abstraction. No external wiring; collaborators install their own sink.

pub mod metrics;
pub mod sink;

pub use metrics::{EventReport, report, reset};
pub use sink::{MetricsEvent, MetricsSink, PlanKind, record, with_sink_override};
