//! The eight shake transitions (spec §4.3).
//!
//! Each function validates its preconditions, then mutates [`ShakeStore`] atomically —
//! either every field changes or (on `Err`) none do. This is the direct structural
//! descendant of the teacher's `try_settle` (`backend/src/settlement/rtgs.rs`): validate
//! first, return before any mutation on failure, never leave a partially-applied record
//! visible.
//!
//! Ledger movement and reputation recording are **not** performed here — per spec §5,
//! pulls happen before any state mutation and pushes happen after the status write, both
//! outside the boundary of "atomic store transaction" this module provides. Settlement
//! functions instead return an outcome descriptor; [`crate::facade::engine::Engine`]
//! performs the actual collaborator calls and decides whether to commit or discard the
//! mutated store.

use crate::collaborators::fee_policy::compute_fee;
use crate::models::fingerprint::Fingerprint;
use crate::models::principal::Principal;
use crate::models::shake::{ShakeId, ShakeStatus};
use crate::models::store::ShakeStore;
use crate::state_machine::errors::EngineError;
use crate::subtree;

/// Payout split computed by `release_shake`/`resolve_dispute` (worker_wins branch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub worker: Principal,
    pub worker_net: u64,
    pub fee: u64,
}

/// Outcome of `resolve_dispute`: either the worker wins (same payout as a release) or
/// loses (the parent's unallocated remainder returns to the requester).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    WorkerWins(ReleaseOutcome),
    WorkerLoses { requester: Principal, worker: Principal, refund_amount: u64 },
}

/// Payout computed by `refund_shake`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundOutcome {
    pub requester: Principal,
    pub amount: u64,
}

/// `create_shake` (spec §4.3). Caller must already have pulled `amount` into custody
/// via the ledger before calling this — see module docs.
pub fn create_shake(
    store: &mut ShakeStore,
    now: u64,
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

    let id = store.next_id();
    let deadline_at = now + deadline_duration;
    store.insert_root(id, requester, amount, deadline_at, task_fingerprint, requester_pubkey_hash);
    Ok(id)
}

/// `accept_shake` (spec §4.3).
pub fn accept_shake(store: &mut ShakeStore, now: u64, caller: Principal, id: ShakeId) -> Result<(), EngineError> {
    let shake = store.get(id)?;
    if shake.status() != ShakeStatus::Pending {
        return Err(EngineError::NotPending { id });
    }
    if now >= shake.deadline_at() {
        return Err(EngineError::DeadlinePassed { now, deadline_at: shake.deadline_at() });
    }
    if shake.worker().is_some() {
        return Err(EngineError::AlreadyAccepted { id });
    }

    let amount = shake.amount();
    store.get_mut(id)?.accept(caller);
    store.set_remaining(id, amount);
    Ok(())
}

/// `deliver_shake` (spec §4.3).
pub fn deliver_shake(
    store: &mut ShakeStore,
    now: u64,
    caller: &Principal,
    id: ShakeId,
    delivery_fingerprint: Fingerprint,
    encrypted_delivery_key: Option<Fingerprint>,
) -> Result<(), EngineError> {
    let shake = store.get(id)?;
    if shake.status() != ShakeStatus::Active {
        return Err(EngineError::NotActive { id });
    }
    if shake.worker() != Some(caller) {
        return Err(EngineError::NotWorker { id });
    }

    store.get_mut(id)?.deliver(delivery_fingerprint, now, encrypted_delivery_key);
    Ok(())
}

/// `create_child_shake` (spec §4.3). Funds are already in custody under the parent;
/// this never touches the ledger (spec §9 "Ownership of child funds").
pub fn create_child_shake(
    store: &mut ShakeStore,
    now: u64,
    caller: &Principal,
    parent_id: ShakeId,
    amount: u64,
    deadline_duration: u64,
    task_fingerprint: Fingerprint,
) -> Result<ShakeId, EngineError> {
    let parent = store.get(parent_id)?;
    if parent.status() != ShakeStatus::Active {
        return Err(EngineError::ParentNotActive { parent_id });
    }
    if parent.worker() != Some(caller) {
        return Err(EngineError::NotParentWorker { parent_id });
    }
    if amount == 0 {
        return Err(EngineError::AmountZero);
    }
    if deadline_duration == 0 {
        return Err(EngineError::DeadlineZero);
    }

    store.decrement_remaining(parent_id, amount)?;

    let child_id = store.next_id();
    let deadline_at = now + deadline_duration;
    store.insert_child(child_id, parent_id, caller.clone(), amount, deadline_at, task_fingerprint);
    Ok(child_id)
}

/// `dispute_shake` (spec §4.3). Returns the ancestor ids actually frozen, for event
/// emission.
pub fn dispute_shake(
    store: &mut ShakeStore,
    now: u64,
    caller: &Principal,
    id: ShakeId,
    dispute_window: u64,
    time_ceiling: u64,
) -> Result<Vec<ShakeId>, EngineError> {
    let shake = store.get(id)?;
    if shake.status() != ShakeStatus::Delivered {
        return Err(EngineError::NotDelivered { id });
    }
    if shake.requester() != caller {
        return Err(EngineError::NotRequester { id });
    }
    let window_closed_at = shake.delivered_at() + dispute_window;
    if now >= window_closed_at {
        return Err(EngineError::DisputeWindowClosed { now, window_closed_at });
    }

    store.get_mut(id)?.set_status(ShakeStatus::Disputed);
    Ok(subtree::freeze_ancestors(store, id, time_ceiling))
}

/// `release_shake` (spec §4.3). `fee_bps` is resolved by the facade (bound dynamic
/// policy, or `protocol_fee_bps`) before this is called.
pub fn release_shake(
    store: &mut ShakeStore,
    now: u64,
    caller: &Principal,
    id: ShakeId,
    dispute_window: u64,
    fee_bps: u16,
) -> Result<ReleaseOutcome, EngineError> {
    let shake = store.get(id)?;
    if shake.status() != ShakeStatus::Delivered {
        return Err(EngineError::NotDelivered { id });
    }
    if let Some(child_id) = subtree::first_unsettled_child(store, id) {
        return Err(EngineError::ChildrenNotSettled { parent_id: id, child_id });
    }
    if !subtree::is_subtree_clean(store, id) {
        return Err(EngineError::SubtreeNotClean { id });
    }

    let shake = store.get(id)?;
    let window_end = shake.effective_window_end(dispute_window);
    let caller_is_requester = shake.requester() == caller;
    if !caller_is_requester && now < window_end {
        return Err(EngineError::DisputeWindowActive { now, window_end });
    }

    let amount = shake.amount();
    let worker = shake.worker().expect("a Delivered shake always has a worker").clone();
    let fee = compute_fee(amount, fee_bps);
    let child_spend = store.child_spend(id)?;
    let worker_net = amount.saturating_sub(child_spend).saturating_sub(fee);

    store.get_mut(id)?.set_status(ShakeStatus::Released);
    Ok(ReleaseOutcome { worker, worker_net, fee })
}

/// `resolve_dispute` (spec §4.3). Returns the outcome and the ancestor ids unfrozen as
/// a side effect of this shake leaving Disputed.
pub fn resolve_dispute(
    store: &mut ShakeStore,
    caller: &Principal,
    id: ShakeId,
    worker_wins: bool,
    treasury: &Principal,
    fee_bps: u16,
) -> Result<(ResolveOutcome, Vec<ShakeId>), EngineError> {
    let shake = store.get(id)?;
    if shake.status() != ShakeStatus::Disputed {
        return Err(EngineError::NotDisputed { id });
    }
    if caller != treasury {
        return Err(EngineError::NotTreasury);
    }

    let outcome = if worker_wins {
        let amount = shake.amount();
        let worker = shake.worker().expect("a Disputed shake always has a worker").clone();
        let fee = compute_fee(amount, fee_bps);
        let child_spend = store.child_spend(id)?;
        let worker_net = amount.saturating_sub(child_spend).saturating_sub(fee);
        store.get_mut(id)?.set_status(ShakeStatus::Released);
        ResolveOutcome::WorkerWins(ReleaseOutcome { worker, worker_net, fee })
    } else {
        // Only the parent's own unallocated remainder returns to the requester;
        // funds already hired out to children stay escrowed under them and settle
        // independently (spec §4.3, §9 open question #1).
        let requester = shake.requester().clone();
        let worker = shake.worker().expect("a Disputed shake always has a worker").clone();
        let refund_amount = store.remaining_of(id).unwrap_or(0);
        store.get_mut(id)?.set_status(ShakeStatus::Refunded);
        ResolveOutcome::WorkerLoses { requester, worker, refund_amount }
    };

    let unfrozen = subtree::unfreeze_ancestors(store, id);
    Ok((outcome, unfrozen))
}

/// `refund_shake` (spec §4.3). Anyone may call this once the deadline passes; the spec
/// names no caller precondition for it.
pub fn refund_shake(store: &mut ShakeStore, now: u64, id: ShakeId) -> Result<RefundOutcome, EngineError> {
    let shake = store.get(id)?;
    if !matches!(shake.status(), ShakeStatus::Pending | ShakeStatus::Active) {
        return Err(EngineError::CannotRefund { id });
    }
    if now < shake.deadline_at() {
        return Err(EngineError::DeadlineNotPassed { now, deadline_at: shake.deadline_at() });
    }

    let requester = shake.requester().clone();
    // For Pending shakes `child_spend` is 0 (no `remaining` scalar was ever set, so the
    // store falls back to `amount`, giving `amount - amount = 0`); for Active shakes it
    // is `amount - remaining`, exactly the closed-form the spec calls for.
    let amount = shake.amount() - store.child_spend(id)?;

    store.get_mut(id)?.set_status(ShakeStatus::Refunded);
    Ok(RefundOutcome { requester, amount })
}
