//! The `Shake` entity: one escrowed agreement between a requester and a worker.
//!
//! A `Shake` is a passive record. It knows how to construct itself (`Shake::new`) and
//! how to expose its fields to readers, but the lifecycle transitions themselves — the
//! preconditions and cross-field effects — live in [`crate::state_machine`], which is
//! the only code in the crate allowed to call the `pub(crate)` mutators below. This
//! mirrors the teacher's `Transaction`: a private-field struct with public accessors,
//! mutated only through a small number of named, crate-internal operations.

use serde::{Deserialize, Serialize};

use crate::models::fingerprint::Fingerprint;
use crate::models::principal::Principal;

/// Monotonic, dense shake identifier.
pub type ShakeId = u64;

/// Lifecycle status of a shake. See the state diagram in SPEC_FULL.md §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShakeStatus {
    Pending,
    Active,
    Delivered,
    Released,
    Disputed,
    Refunded,
}

impl ShakeStatus {
    /// Terminal statuses never transition further (invariant #2, P4).
    pub fn is_terminal(self) -> bool {
        matches!(self, ShakeStatus::Released | ShakeStatus::Refunded)
    }
}

/// The escrowed agreement record.
///
/// All monetary fields are `u64` minor units (the original deployment uses 6 decimals);
/// the engine only adds and subtracts them, never interprets the decimal placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shake {
    id: ShakeId,
    requester: Principal,
    worker: Option<Principal>,
    amount: u64,
    parent_id: Option<ShakeId>,
    deadline_at: u64,
    delivered_at: u64,
    status: ShakeStatus,
    task_fingerprint: Fingerprint,
    delivery_fingerprint: Fingerprint,
    dispute_frozen_until: u64,
    requester_pubkey_hash: Option<Fingerprint>,
    encrypted_delivery_key: Option<Fingerprint>,
}

impl Shake {
    /// Construct a new root or child shake in `Pending` status.
    ///
    /// Callers go through [`crate::models::store::ShakeStore::insert_root`] or
    /// [`crate::models::store::ShakeStore::insert_child`] rather than holding a bare
    /// `Shake`, so this is `pub(crate)`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ShakeId,
        requester: Principal,
        amount: u64,
        parent_id: Option<ShakeId>,
        deadline_at: u64,
        task_fingerprint: Fingerprint,
        requester_pubkey_hash: Option<Fingerprint>,
    ) -> Self {
        Self {
            id,
            requester,
            worker: None,
            amount,
            parent_id,
            deadline_at,
            delivered_at: 0,
            status: ShakeStatus::Pending,
            task_fingerprint,
            delivery_fingerprint: Fingerprint::default(),
            dispute_frozen_until: 0,
            requester_pubkey_hash,
            encrypted_delivery_key: None,
        }
    }

    pub fn id(&self) -> ShakeId {
        self.id
    }

    pub fn requester(&self) -> &Principal {
        &self.requester
    }

    pub fn worker(&self) -> Option<&Principal> {
        self.worker.as_ref()
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// `true` if this shake was created by `create_child_shake` rather than `create_shake`.
    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn parent_id(&self) -> Option<ShakeId> {
        self.parent_id
    }

    pub fn deadline_at(&self) -> u64 {
        self.deadline_at
    }

    pub fn delivered_at(&self) -> u64 {
        self.delivered_at
    }

    pub fn status(&self) -> ShakeStatus {
        self.status
    }

    pub fn task_fingerprint(&self) -> &Fingerprint {
        &self.task_fingerprint
    }

    pub fn delivery_fingerprint(&self) -> &Fingerprint {
        &self.delivery_fingerprint
    }

    /// 0 when not frozen; otherwise the time-ceiling sentinel (invariant #6).
    pub fn dispute_frozen_until(&self) -> u64 {
        self.dispute_frozen_until
    }

    pub fn requester_pubkey_hash(&self) -> Option<&Fingerprint> {
        self.requester_pubkey_hash.as_ref()
    }

    pub fn encrypted_delivery_key(&self) -> Option<&Fingerprint> {
        self.encrypted_delivery_key.as_ref()
    }

    /// Effective end of the dispute/release window: the later of the base window and
    /// any freeze sentinel (spec §4.3 `release_shake`).
    pub fn effective_window_end(&self, dispute_window: u64) -> u64 {
        (self.delivered_at + dispute_window).max(self.dispute_frozen_until)
    }

    // -- crate-internal mutators, called only from `state_machine::transitions` --

    pub(crate) fn accept(&mut self, worker: Principal) {
        self.worker = Some(worker);
        self.status = ShakeStatus::Active;
    }

    pub(crate) fn deliver(&mut self, delivery_fingerprint: Fingerprint, now: u64, encrypted_delivery_key: Option<Fingerprint>) {
        self.delivery_fingerprint = delivery_fingerprint;
        self.delivered_at = now;
        self.status = ShakeStatus::Delivered;
        self.encrypted_delivery_key = encrypted_delivery_key;
    }

    pub(crate) fn set_status(&mut self, status: ShakeStatus) {
        self.status = status;
    }

    pub(crate) fn freeze(&mut self, time_ceiling: u64) {
        self.dispute_frozen_until = time_ceiling;
    }

    pub(crate) fn unfreeze(&mut self) {
        self.dispute_frozen_until = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(tag: &str) -> Fingerprint {
        Fingerprint::new(tag.as_bytes().to_vec())
    }

    #[test]
    fn new_shake_starts_pending_with_no_worker() {
        let shake = Shake::new(1, Principal::from("r"), 100, None, 10, fingerprint("task"), None);
        assert_eq!(shake.status(), ShakeStatus::Pending);
        assert!(shake.worker().is_none());
        assert!(!shake.is_child());
    }

    #[test]
    fn accept_sets_worker_and_active_status() {
        let mut shake = Shake::new(1, Principal::from("r"), 100, None, 10, fingerprint("task"), None);
        shake.accept(Principal::from("w"));
        assert_eq!(shake.status(), ShakeStatus::Active);
        assert_eq!(shake.worker(), Some(&Principal::from("w")));
    }

    #[test]
    fn effective_window_end_uses_freeze_sentinel_when_later() {
        let mut shake = Shake::new(1, Principal::from("r"), 100, None, 10, fingerprint("task"), None);
        shake.deliver(fingerprint("delivery"), 100, None);
        assert_eq!(shake.effective_window_end(50), 150);
        shake.freeze(1_000_000);
        assert_eq!(shake.effective_window_end(50), 1_000_000);
    }

    #[test]
    fn terminal_statuses_are_recognized() {
        assert!(ShakeStatus::Released.is_terminal());
        assert!(ShakeStatus::Refunded.is_terminal());
        assert!(!ShakeStatus::Disputed.is_terminal());
    }
}
