//! Metrics sink boundary.
//!
//! Builder and composer code MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{error::ErrorClass, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Compose {
        entity: &'static str,
        params: u64,
        filter_nodes: u64,
    },
    Reject {
        entity: &'static str,
        class: ErrorClass,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Used whenever no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Compose {
                entity,
                params,
                filter_nodes,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.compose_calls = m.ops.compose_calls.saturating_add(1);
                    m.ops.params_emitted = m.ops.params_emitted.saturating_add(params);
                    m.ops.filter_nodes = m.ops.filter_nodes.saturating_add(filter_nodes);

                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.compose_calls = entry.compose_calls.saturating_add(1);
                    entry.params_emitted = entry.params_emitted.saturating_add(params);
                });
            }

            MetricsEvent::Reject { entity, class } => {
                metrics::with_state_mut(|m| {
                    let counter = match class {
                        ErrorClass::Unsupported => &mut m.ops.unsupported,
                        ErrorClass::TypeMismatch => &mut m.ops.type_mismatches,
                        ErrorClass::InvalidArgument | ErrorClass::Config => {
                            &mut m.ops.invalid_arguments
                        }
                        ErrorClass::Resolution => &mut m.ops.resolution_failures,
                        ErrorClass::Limit => &mut m.ops.limit_exceeded,
                    };
                    *counter = counter.saturating_add(1);

                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.rejections = entry.rejections.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` comes from a live `&dyn MetricsSink` installed by `with_metrics_sink`.
        // - `with_metrics_sink` restores the previous slot on every exit, unwinding
        //   included, so the pointer never outlives the borrow.
        // - `record` dispatches synchronously and never stores `ptr`.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// Events recorded on this thread while `f` runs go to `sink` instead of
/// the global counters. Overrides nest.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The pointer is installed only for this dynamic scope; `Guard`
    //   restores the previous slot on all exits, panics included.
    // - Only shared access is ever materialized from it.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}
