//! The public facade: one method per operation in spec §4.3, each running the full
//! snapshot → validate → mutate → settle → commit sequence under a single mutex (§5).
//!
//! Generalized from the teacher's `Orchestrator` (`backend/src/orchestrator/engine.rs`):
//! a struct that owns all mutable state plus its collaborators and exposes a small,
//! serialized surface. Unlike the teacher's `tick()` loop, there is no time-driven
//! scheduling here — every call is triggered by a caller, and `now` is read once per
//! call from the injected [`Clock`].

use std::sync::Mutex;

use crate::collaborators::fee_policy::FeePolicy;
use crate::collaborators::ledger::LedgerAdapter;
use crate::collaborators::reputation::ReputationSink;
use crate::core::clock::Clock;
use crate::events::{Event, EventLog};
use crate::facade::config::EngineConfig;
use crate::models::fingerprint::Fingerprint;
use crate::models::principal::Principal;
use crate::models::shake::{Shake, ShakeId};
use crate::models::store::ShakeStore;
use crate::state_machine::errors::EngineError;
use crate::state_machine::transitions::{self, ResolveOutcome};

struct EngineState {
    store: ShakeStore,
    events: EventLog,
}

/// Owns every shake in the forest plus the collaborators needed to settle them.
///
/// All mutating methods take `&self` (not `&mut self`): the single internal [`Mutex`]
/// is the concurrency boundary, so an `Engine` can be shared behind an `Arc` across
/// threads without an outer lock.
pub struct Engine {
    inner: Mutex<EngineState>,
    ledger: Box<dyn LedgerAdapter>,
    reputation: Box<dyn ReputationSink>,
    fee_policy: Option<Box<dyn FeePolicy>>,
    clock: Box<dyn Clock>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        ledger: Box<dyn LedgerAdapter>,
        reputation: Box<dyn ReputationSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            inner: Mutex::new(EngineState { store: ShakeStore::new(), events: EventLog::new() }),
            ledger,
            reputation,
            fee_policy: None,
            clock,
            config,
        }
    }

    /// Bind a dynamic fee policy; without one the engine falls back to
    /// `config.protocol_fee_bps` for every depth (spec §4.1).
    pub fn with_fee_policy(mut self, policy: Box<dyn FeePolicy>) -> Self {
        self.fee_policy = Some(policy);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn resolve_fee_bps(&self, amount: u64, depth: u64) -> u16 {
        match &self.fee_policy {
            Some(policy) => policy.fee_bps(amount, depth),
            None => self.config.protocol_fee_bps,
        }
    }

    // -- read-only views: snapshot reads, never mutate --

    pub fn get_shake(&self, id: ShakeId) -> Result<Shake, EngineError> {
        self.inner.lock().unwrap().store.get(id).cloned()
    }

    pub fn children_of(&self, id: ShakeId) -> Vec<ShakeId> {
        self.inner.lock().unwrap().store.children_of(id).to_vec()
    }

    pub fn remaining_of(&self, id: ShakeId) -> Option<u64> {
        self.inner.lock().unwrap().store.remaining_of(id)
    }

    pub fn events_for(&self, id: ShakeId) -> Vec<Event> {
        self.inner.lock().unwrap().events.for_shake(id).cloned().collect()
    }

    // -- operations (spec §4.3) --

    #[allow(clippy::too_many_arguments)]
    pub fn create_shake(
        &self,
        requester: Principal,
        amount: u64,
        deadline_duration: u64,
        task_fingerprint: Fingerprint,
        requester_pubkey_hash: Option<Fingerprint>,
    ) -> Result<ShakeId, EngineError> {
        if amount == 0 {
            return Err(EngineError::AmountZero);
        }
        if deadline_duration == 0 {
            return Err(EngineError::DeadlineZero);
        }

        let mut state = self.inner.lock().unwrap();
        // Pulls happen before any state mutation (spec §5).
        self.ledger.pull(&requester, amount).map_err(EngineError::LedgerPullFailed)?;

        let now = self.clock.now();
        let mut store = state.store.clone();
        let id = transitions::create_shake(
            &mut store,
            now,
            requester.clone(),
            amount,
            deadline_duration,
            task_fingerprint,
            requester_pubkey_hash,
        )?;
        state.events.push(Event::Created { at: now, id, requester, amount, parent_id: None });
        state.store = store;

        tracing::info!(shake_id = id, amount, "shake created");
        Ok(id)
    }

    pub fn accept_shake(&self, caller: Principal, id: ShakeId) -> Result<(), EngineError> {
        let mut state = self.inner.lock().unwrap();
        let now = self.clock.now();
        let mut store = state.store.clone();
        transitions::accept_shake(&mut store, now, caller.clone(), id)?;
        state.events.push(Event::Accepted { at: now, id, worker: caller });
        state.store = store;

        tracing::info!(shake_id = id, "shake accepted");
        Ok(())
    }

    pub fn deliver_shake(
        &self,
        caller: Principal,
        id: ShakeId,
        delivery_fingerprint: Fingerprint,
        encrypted_delivery_key: Option<Fingerprint>,
    ) -> Result<(), EngineError> {
        let mut state = self.inner.lock().unwrap();
        let now = self.clock.now();
        let mut store = state.store.clone();
        transitions::deliver_shake(&mut store, now, &caller, id, delivery_fingerprint, encrypted_delivery_key)?;
        state.events.push(Event::Delivered { at: now, id });
        state.store = store;

        tracing::info!(shake_id = id, "shake delivered");
        Ok(())
    }

    pub fn create_child_shake(
        &self,
        caller: Principal,
        parent_id: ShakeId,
        amount: u64,
        deadline_duration: u64,
        task_fingerprint: Fingerprint,
    ) -> Result<ShakeId, EngineError> {
        let mut state = self.inner.lock().unwrap();
        let now = self.clock.now();
        let mut store = state.store.clone();
        let child_id =
            transitions::create_child_shake(&mut store, now, &caller, parent_id, amount, deadline_duration, task_fingerprint)?;
        state.events.push(Event::ChildHired { at: now, parent_id, child_id, amount });
        state.store = store;

        tracing::info!(parent_id, child_id, amount, "child shake hired");
        Ok(child_id)
    }

    pub fn dispute_shake(&self, caller: Principal, id: ShakeId) -> Result<(), EngineError> {
        let mut state = self.inner.lock().unwrap();
        let now = self.clock.now();
        let mut store = state.store.clone();
        let frozen = transitions::dispute_shake(&mut store, now, &caller, id, self.config.dispute_window, self.config.time_ceiling)?;
        state.events.push(Event::Disputed { at: now, id });
        for ancestor_id in &frozen {
            state.events.push(Event::Frozen { at: now, id: *ancestor_id });
        }
        state.store = store;

        tracing::info!(shake_id = id, frozen = frozen.len(), "shake disputed");
        Ok(())
    }

    /// Ledger pushes happen after the status write so a retried call is idempotent: a
    /// second attempt finds the shake already `Released` and rejects with
    /// `NotDelivered` rather than double-paying (spec §5).
    pub fn release_shake(&self, caller: Principal, id: ShakeId) -> Result<(), EngineError> {
        let mut state = self.inner.lock().unwrap();
        let now = self.clock.now();
        let mut store = state.store.clone();

        let depth = store.depth(id)?;
        let fee_bps = self.resolve_fee_bps(store.get(id)?.amount(), depth);
        let outcome = transitions::release_shake(&mut store, now, &caller, id, self.config.dispute_window, fee_bps)?;

        self.ledger.push(&outcome.worker, outcome.worker_net).map_err(EngineError::LedgerPushFailed)?;
        self.ledger.push(&self.config.treasury, outcome.fee).map_err(EngineError::LedgerPushFailed)?;
        if self.reputation.record(&outcome.worker, outcome.worker_net, true).is_err() {
            tracing::warn!(shake_id = id, "reputation sink failed to record release outcome");
        }

        state.events.push(Event::Released { at: now, id, worker_net: outcome.worker_net, fee: outcome.fee });
        state.store = store;

        tracing::info!(shake_id = id, worker_net = outcome.worker_net, fee = outcome.fee, "shake released");
        Ok(())
    }

    pub fn resolve_dispute(&self, caller: Principal, id: ShakeId, worker_wins: bool) -> Result<(), EngineError> {
        let mut state = self.inner.lock().unwrap();
        let mut store = state.store.clone();

        let depth = store.depth(id)?;
        let fee_bps = self.resolve_fee_bps(store.get(id)?.amount(), depth);
        let (outcome, unfrozen) =
            transitions::resolve_dispute(&mut store, &caller, id, worker_wins, &self.config.treasury, fee_bps)?;
        let now = self.clock.now();

        match &outcome {
            ResolveOutcome::WorkerWins(release) => {
                self.ledger.push(&release.worker, release.worker_net).map_err(EngineError::LedgerPushFailed)?;
                self.ledger.push(&self.config.treasury, release.fee).map_err(EngineError::LedgerPushFailed)?;
                if self.reputation.record(&release.worker, release.worker_net, true).is_err() {
                    tracing::warn!(shake_id = id, "reputation sink failed to record dispute-win outcome");
                }
                state.events.push(Event::Released { at: now, id, worker_net: release.worker_net, fee: release.fee });
            }
            ResolveOutcome::WorkerLoses { requester, worker, refund_amount } => {
                self.ledger.push(requester, *refund_amount).map_err(EngineError::LedgerPushFailed)?;
                if self.reputation.record(worker, 0, false).is_err() {
                    tracing::warn!(shake_id = id, "reputation sink failed to record dispute-loss outcome");
                }
                state.events.push(Event::Refunded { at: now, id, amount: *refund_amount });
            }
        }
        for ancestor_id in &unfrozen {
            state.events.push(Event::Unfrozen { at: now, id: *ancestor_id });
        }
        state.store = store;

        tracing::info!(shake_id = id, worker_wins, "dispute resolved");
        Ok(())
    }

    pub fn refund_shake(&self, id: ShakeId) -> Result<(), EngineError> {
        let mut state = self.inner.lock().unwrap();
        let now = self.clock.now();
        let mut store = state.store.clone();
        let outcome = transitions::refund_shake(&mut store, now, id)?;

        self.ledger.push(&outcome.requester, outcome.amount).map_err(EngineError::LedgerPushFailed)?;

        state.events.push(Event::Refunded { at: now, id, amount: outcome.amount });
        state.store = store;

        tracing::info!(shake_id = id, amount = outcome.amount, "shake refunded");
        Ok(())
    }
}
