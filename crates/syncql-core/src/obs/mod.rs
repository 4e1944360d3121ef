//! Observability: compile-time telemetry counters and the sink boundary.
//!
//! Nothing in here influences the composed output. Counters are
//! thread-local and reset on request.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EntityCounters, EntitySummary, EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
