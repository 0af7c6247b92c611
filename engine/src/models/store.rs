//! `ShakeStore`: the keyed maps backing every shake, generalized from the teacher's
//! `SimulationState` (agents map + transactions map + central queue, all `BTreeMap` for
//! deterministic iteration).
//!
//! Per spec §6, the persisted layout is three keyed maps plus an id counter. A real
//! deployment would back this with a durable, atomically-committing substrate; this
//! implementation keeps it entirely in memory and relies on the facade's snapshot/commit
//! discipline (§4.5, §5) for transactionality — see [`crate::facade::engine::Engine`].

use std::collections::BTreeMap;

use crate::models::fingerprint::Fingerprint;
use crate::models::principal::Principal;
use crate::models::shake::{Shake, ShakeId};
use crate::state_machine::errors::EngineError;

/// All engine-owned state for one tree forest.
///
/// Cloned wholesale by the facade at the start of each operation and discarded (not
/// committed back) if the operation fails — see [`crate::facade::engine::Engine`].
#[derive(Debug, Clone, Default)]
pub struct ShakeStore {
    shakes: BTreeMap<ShakeId, Shake>,
    /// parent id -> ordered child ids, insertion order (spec §3 "Child adjacency").
    children: BTreeMap<ShakeId, Vec<ShakeId>>,
    /// Active shake id -> unallocated portion of `amount` (spec §3 "Remaining-budget").
    remaining: BTreeMap<ShakeId, u64>,
    next_id: ShakeId,
}

impl ShakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next dense id without yet inserting a record.
    pub(crate) fn next_id(&mut self) -> ShakeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn insert_root(
        &mut self,
        id: ShakeId,
        requester: Principal,
        amount: u64,
        deadline_at: u64,
        task_fingerprint: Fingerprint,
        requester_pubkey_hash: Option<Fingerprint>,
    ) {
        let shake = Shake::new(id, requester, amount, None, deadline_at, task_fingerprint, requester_pubkey_hash);
        self.shakes.insert(id, shake);
    }

    pub(crate) fn insert_child(
        &mut self,
        id: ShakeId,
        parent_id: ShakeId,
        requester: Principal,
        amount: u64,
        deadline_at: u64,
        task_fingerprint: Fingerprint,
    ) {
        let shake = Shake::new(id, requester, amount, Some(parent_id), deadline_at, task_fingerprint, None);
        self.shakes.insert(id, shake);
        self.children.entry(parent_id).or_default().push(id);
    }

    pub fn get(&self, id: ShakeId) -> Result<&Shake, EngineError> {
        self.shakes.get(&id).ok_or(EngineError::ShakeNotFound { id })
    }

    pub(crate) fn get_mut(&mut self, id: ShakeId) -> Result<&mut Shake, EngineError> {
        self.shakes.get_mut(&id).ok_or(EngineError::ShakeNotFound { id })
    }

    /// Direct children of `id`, in insertion order. Empty slice if `id` has none.
    pub fn children_of(&self, id: ShakeId) -> &[ShakeId] {
        self.children.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Remaining unallocated budget of an Active shake; `None` before acceptance or
    /// after settlement removes the scalar's meaning (spec keeps it defined through
    /// settlement so `release_shake`/`refund_shake` can still read `child_spend`).
    pub fn remaining_of(&self, id: ShakeId) -> Option<u64> {
        self.remaining.get(&id).copied()
    }

    pub(crate) fn set_remaining(&mut self, id: ShakeId, value: u64) {
        self.remaining.insert(id, value);
    }

    pub(crate) fn decrement_remaining(&mut self, id: ShakeId, by: u64) -> Result<(), EngineError> {
        let current = self.remaining.get(&id).copied().unwrap_or(0);
        let updated = current.checked_sub(by).ok_or(EngineError::ExceedsParentBudget {
            requested: by,
            available: current,
        })?;
        self.remaining.insert(id, updated);
        Ok(())
    }

    /// Portion of `amount` already consumed hiring children: `amount - remaining`.
    /// Zero for a shake that never had a remaining scalar set (Pending, never accepted).
    pub fn child_spend(&self, id: ShakeId) -> Result<u64, EngineError> {
        let shake = self.get(id)?;
        let remaining = self.remaining_of(id).unwrap_or(shake.amount());
        Ok(shake.amount() - remaining)
    }

    /// Depth of `id`: number of parent edges walked to reach a root (spec §4.1).
    pub fn depth(&self, id: ShakeId) -> Result<u64, EngineError> {
        let mut depth = 0u64;
        let mut current = self.get(id)?;
        while let Some(parent_id) = current.parent_id() {
            depth += 1;
            current = self.get(parent_id)?;
        }
        Ok(depth)
    }

    /// All shake ids, ascending — used by property tests to scan the whole store.
    pub fn ids(&self) -> impl Iterator<Item = ShakeId> + '_ {
        self.shakes.keys().copied()
    }
}
