use chrono::Utc;
use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for compile operations.
///

#[derive(Clone, Debug)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) entities: BTreeMap<String, EntityCounters>,
    pub(crate) since_ms: i64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            entities: BTreeMap::new(),
            since_ms: Utc::now().timestamp_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Composer
    pub compose_calls: u64,
    pub params_emitted: u64,
    pub filter_nodes: u64,

    // Rejections by class
    pub unsupported: u64,
    pub type_mismatches: u64,
    pub invalid_arguments: u64,
    pub resolution_failures: u64,
    pub limit_exceeded: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub compose_calls: u64,
    pub params_emitted: u64,
    pub rejections: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters and restart the window.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
/// Point-in-time snapshot of the counters.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventReport {
    pub since_ms: i64,
    pub ops: EventOps,
    /// Per-entity counters, ordered by entity name.
    pub entity_counters: Vec<EntitySummary>,
}

impl EventReport {
    /// Counters for one entity, if it recorded anything.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntitySummary> {
        self.entity_counters.iter().find(|e| e.entity == name)
    }
}

///
/// EntitySummary
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EntitySummary {
    pub entity: String,
    pub compose_calls: u64,
    pub rejections: u64,
    pub avg_params_per_compose: f64,
}

/// Build a report from the in-memory counters.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let entity_counters = snap
        .entities
        .iter()
        .map(|(entity, counters)| EntitySummary {
            entity: entity.clone(),
            compose_calls: counters.compose_calls,
            rejections: counters.rejections,
            avg_params_per_compose: if counters.compose_calls > 0 {
                counters.params_emitted as f64 / counters.compose_calls as f64
            } else {
                0.0
            },
        })
        .collect();

    EventReport {
        since_ms: snap.since_ms,
        ops: snap.ops,
        entity_counters,
    }
}
