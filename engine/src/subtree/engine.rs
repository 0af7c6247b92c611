//! Subtree-level recursions, implemented as explicit-stack iteration (spec §4.4, §9)
//! rather than recursive function calls, to bound worst-case host-stack use on deep or
//! wide trees. Grounded in the teacher's own approach to graph traversal
//! (`backend/src/settlement/lsm/graph.rs`'s `AggregatedGraph`, built with explicit
//! `BTreeMap` adjacency and no recursion).

use crate::models::shake::{ShakeId, ShakeStatus};
use crate::models::store::ShakeStore;

/// `true` if no descendant of `id` (not `id` itself) is currently Disputed.
///
/// Depth-first over `children[id]` using an explicit stack; returns `false` as soon as
/// a Disputed descendant is found.
pub fn is_subtree_clean(store: &ShakeStore, id: ShakeId) -> bool {
    let mut stack: Vec<ShakeId> = store.children_of(id).to_vec();
    while let Some(current) = stack.pop() {
        let Ok(shake) = store.get(current) else { continue };
        if shake.status() == ShakeStatus::Disputed {
            return false;
        }
        stack.extend(store.children_of(current));
    }
    true
}

/// First direct child of `id` that is not in a terminal status, if any.
///
/// This is the cheaper, shallow check `release_shake` runs before the deeper
/// `is_subtree_clean` recursion (spec §9 "keep both" open-question decision).
pub fn first_unsettled_child(store: &ShakeStore, id: ShakeId) -> Option<ShakeId> {
    store
        .children_of(id)
        .iter()
        .copied()
        .find(|&child_id| store.get(child_id).map(|c| !c.status().is_terminal()).unwrap_or(false))
}

/// Walk from `id` up through every ancestor, freezing any ancestor currently in
/// `{Active, Delivered}` by setting `dispute_frozen_until` to `time_ceiling`.
///
/// Returns the ids actually frozen, for event emission.
pub fn freeze_ancestors(store: &mut ShakeStore, id: ShakeId, time_ceiling: u64) -> Vec<ShakeId> {
    let mut frozen = Vec::new();
    let mut current = match store.get(id) {
        Ok(shake) => shake.parent_id(),
        Err(_) => None,
    };
    while let Some(ancestor_id) = current {
        let Ok(ancestor) = store.get(ancestor_id) else { break };
        let next = ancestor.parent_id();
        if matches!(ancestor.status(), ShakeStatus::Active | ShakeStatus::Delivered) {
            if let Ok(ancestor_mut) = store.get_mut(ancestor_id) {
                ancestor_mut.freeze(time_ceiling);
                frozen.push(ancestor_id);
            }
        }
        current = next;
    }
    frozen
}

/// Walk from `id` up through every ancestor; for each one whose `dispute_frozen_until`
/// is set and whose subtree is now clean, clear the sentinel.
///
/// Returns the ids actually unfrozen, for event emission.
pub fn unfreeze_ancestors(store: &mut ShakeStore, id: ShakeId) -> Vec<ShakeId> {
    let mut unfrozen = Vec::new();
    let mut current = match store.get(id) {
        Ok(shake) => shake.parent_id(),
        Err(_) => None,
    };
    while let Some(ancestor_id) = current {
        let Ok(ancestor) = store.get(ancestor_id) else { break };
        let next = ancestor.parent_id();
        if ancestor.dispute_frozen_until() != 0 && is_subtree_clean(store, ancestor_id) {
            if let Ok(ancestor_mut) = store.get_mut(ancestor_id) {
                ancestor_mut.unfreeze();
                unfrozen.push(ancestor_id);
            }
        }
        current = next;
    }
    unfrozen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fingerprint::Fingerprint;
    use crate::models::principal::Principal;

    fn build_chain(store: &mut ShakeStore, depth: usize) -> Vec<ShakeId> {
        let mut ids = Vec::new();
        let root = store.next_id();
        store.insert_root(root, Principal::from("r"), 1_000, 100, Fingerprint::default(), None);
        store.set_remaining(root, 1_000);
        ids.push(root);
        let mut parent = root;
        for _ in 0..depth {
            let child = store.next_id();
            store.insert_child(child, parent, Principal::from("r"), 10, 100, Fingerprint::default());
            store.set_remaining(child, 10);
            ids.push(child);
            parent = child;
        }
        ids
    }

    #[test]
    fn clean_subtree_with_no_children_is_clean() {
        let mut store = ShakeStore::new();
        let ids = build_chain(&mut store, 0);
        assert!(is_subtree_clean(&store, ids[0]));
    }

    #[test]
    fn disputed_descendant_marks_subtree_unclean() {
        let mut store = ShakeStore::new();
        let ids = build_chain(&mut store, 2);
        store.get_mut(ids[2]).unwrap().set_status(ShakeStatus::Disputed);
        assert!(!is_subtree_clean(&store, ids[0]));
        // The disputed node itself is not a "descendant of itself".
        assert!(is_subtree_clean(&store, ids[2]));
    }

    #[test]
    fn freeze_ancestors_stops_at_non_active_non_delivered() {
        let mut store = ShakeStore::new();
        let ids = build_chain(&mut store, 2);
        // root is Active by construction fiat for this test:
        store.get_mut(ids[0]).unwrap().set_status(ShakeStatus::Active);
        store.get_mut(ids[1]).unwrap().set_status(ShakeStatus::Delivered);
        let frozen = freeze_ancestors(&mut store, ids[2], 999);
        assert_eq!(frozen, vec![ids[1], ids[0]]);
        assert_eq!(store.get(ids[0]).unwrap().dispute_frozen_until(), 999);
        assert_eq!(store.get(ids[1]).unwrap().dispute_frozen_until(), 999);
    }

    #[test]
    fn unfreeze_ancestors_only_clears_when_subtree_clean() {
        let mut store = ShakeStore::new();
        let ids = build_chain(&mut store, 2);
        store.get_mut(ids[0]).unwrap().set_status(ShakeStatus::Active);
        store.get_mut(ids[1]).unwrap().set_status(ShakeStatus::Delivered);
        store.get_mut(ids[2]).unwrap().set_status(ShakeStatus::Disputed);
        freeze_ancestors(&mut store, ids[2], 999);

        // Still disputed: unfreeze should do nothing.
        let unfrozen = unfreeze_ancestors(&mut store, ids[2]);
        assert!(unfrozen.is_empty());
        assert_eq!(store.get(ids[0]).unwrap().dispute_frozen_until(), 999);

        // Resolve the dispute, then unfreeze should clear both ancestors.
        store.get_mut(ids[2]).unwrap().set_status(ShakeStatus::Released);
        let unfrozen = unfreeze_ancestors(&mut store, ids[2]);
        assert_eq!(unfrozen, vec![ids[1], ids[0]]);
        assert_eq!(store.get(ids[0]).unwrap().dispute_frozen_until(), 0);
        assert_eq!(store.get(ids[1]).unwrap().dispute_frozen_until(), 0);
    }

    #[test]
    fn first_unsettled_child_finds_non_terminal_direct_child() {
        let mut store = ShakeStore::new();
        let ids = build_chain(&mut store, 1);
        assert_eq!(first_unsettled_child(&store, ids[0]), Some(ids[1]));
        store.get_mut(ids[1]).unwrap().set_status(ShakeStatus::Released);
        assert_eq!(first_unsettled_child(&store, ids[0]), None);
    }

    #[test]
    fn explicit_stack_handles_deep_chains_without_recursion() {
        let mut store = ShakeStore::new();
        let ids = build_chain(&mut store, 5_000);
        assert!(is_subtree_clean(&store, ids[0]));
        store.get_mut(*ids.last().unwrap()).unwrap().set_status(ShakeStatus::Disputed);
        assert!(!is_subtree_clean(&store, ids[0]));
    }
}
