//! Append-only audit event log (supplemented feature, see SPEC_FULL.md §2).
//!
//! Generalized from the teacher's `Event`/`EventLog` (`backend/src/models/event.rs`):
//! one tagged enum variant per significant transition, collected in order, queryable by
//! shake id. Unlike the teacher's log this one is not part of the money-path invariants
//! (SPEC_FULL §2) — it exists purely as the observability surface a downstream indexer
//! would consume.

use crate::models::principal::Principal;
use crate::models::shake::ShakeId;

/// A single observed transition. `at` is the engine clock's `now()` at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Created { at: u64, id: ShakeId, requester: Principal, amount: u64, parent_id: Option<ShakeId> },
    Accepted { at: u64, id: ShakeId, worker: Principal },
    Delivered { at: u64, id: ShakeId },
    ChildHired { at: u64, parent_id: ShakeId, child_id: ShakeId, amount: u64 },
    Disputed { at: u64, id: ShakeId },
    Frozen { at: u64, id: ShakeId },
    Unfrozen { at: u64, id: ShakeId },
    Released { at: u64, id: ShakeId, worker_net: u64, fee: u64 },
    Refunded { at: u64, id: ShakeId, amount: u64 },
}

impl Event {
    pub fn tick(&self) -> u64 {
        match *self {
            Event::Created { at, .. }
            | Event::Accepted { at, .. }
            | Event::Delivered { at, .. }
            | Event::ChildHired { at, .. }
            | Event::Disputed { at, .. }
            | Event::Frozen { at, .. }
            | Event::Unfrozen { at, .. }
            | Event::Released { at, .. }
            | Event::Refunded { at, .. } => at,
        }
    }

    /// The shake id this event is about, where applicable (`ChildHired` reports the
    /// parent; query by the child id separately if needed).
    pub fn shake_id(&self) -> ShakeId {
        match *self {
            Event::Created { id, .. }
            | Event::Accepted { id, .. }
            | Event::Delivered { id, .. }
            | Event::Disputed { id, .. }
            | Event::Frozen { id, .. }
            | Event::Unfrozen { id, .. }
            | Event::Released { id, .. }
            | Event::Refunded { id, .. } => id,
            Event::ChildHired { parent_id, .. } => parent_id,
        }
    }
}

/// Append-only log of every committed transition.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn for_shake(&self, id: ShakeId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.shake_id() == id)
    }

    pub fn in_range(&self, from_tick: u64, to_tick: u64) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.tick() >= from_tick && e.tick() <= to_tick)
    }
}
