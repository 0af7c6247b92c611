//! Dispute freeze/unfreeze cascade across a two-level tree (spec §8 S4).

use std::sync::Arc;

use shake_engine::collaborators::ledger::test_support::InMemoryLedger;
use shake_engine::collaborators::reputation::test_support::RecordingSink;
use shake_engine::{Engine, EngineConfig, EngineError, Fingerprint, Principal, ShakeStatus, TestClock};

mod common;

#[test]
fn disputed_child_blocks_parent_release_until_resolved() {
    common::init_tracing();
    let r = Principal::from("r");
    let w = Principal::from("w");
    let s = Principal::from("s");
    let treasury = Principal::from("treasury");

    let clock = Arc::new(TestClock::new(0));
    let ledger = InMemoryLedger::new();
    ledger.fund(&r, 500);
    let mut config = EngineConfig::new(treasury.clone());
    config.dispute_window = 100;
    let engine = Engine::new(config, Box::new(ledger), Box::new(RecordingSink::new()), Box::new(Arc::clone(&clock)));

    let parent = engine.create_shake(r.clone(), 500, 10_000, Fingerprint::new(b"p".to_vec()), None).unwrap();
    engine.accept_shake(w.clone(), parent).unwrap();
    let child = engine.create_child_shake(w.clone(), parent, 100, 10_000, Fingerprint::new(b"c".to_vec())).unwrap();
    engine.accept_shake(s.clone(), child).unwrap();

    clock.set(10);
    engine.deliver_shake(s, child, Fingerprint::new(b"cd".to_vec()), None).unwrap();
    engine.dispute_shake(w.clone(), child).unwrap();
    assert_eq!(engine.get_shake(child).unwrap().status(), ShakeStatus::Disputed);

    clock.set(20);
    engine.deliver_shake(w.clone(), parent, Fingerprint::new(b"pd".to_vec()), None).unwrap();
    // The parent is frozen by the descendant dispute (spec §4.4): its effective window
    // end is pinned at the time-ceiling sentinel, so even a non-requester caller who
    // waits out the nominal dispute_window cannot slip through.
    clock.set(20 + 100 + 1);
    let err = engine.release_shake(Principal::from("anyone"), parent).unwrap_err();
    assert!(matches!(err, EngineError::SubtreeNotClean { .. }) || matches!(err, EngineError::ChildrenNotSettled { .. }));

    engine.resolve_dispute(treasury, child, true).unwrap();
    assert_eq!(engine.get_shake(child).unwrap().status(), ShakeStatus::Released);

    engine.release_shake(r, parent).unwrap();
    assert_eq!(engine.get_shake(parent).unwrap().status(), ShakeStatus::Released);
    assert_eq!(engine.get_shake(child).unwrap().status(), ShakeStatus::Released);
}

#[test]
fn unfreeze_clears_the_sentinel_once_the_subtree_is_clean_again() {
    common::init_tracing();
    let r = Principal::from("r");
    let w = Principal::from("w");
    let s = Principal::from("s");
    let treasury = Principal::from("treasury");

    let clock = Arc::new(TestClock::new(0));
    let ledger = InMemoryLedger::new();
    ledger.fund(&r, 500);
    let engine = Engine::new(EngineConfig::new(treasury.clone()), Box::new(ledger), Box::new(RecordingSink::new()), Box::new(Arc::clone(&clock)));

    let parent = engine.create_shake(r, 500, 10_000, Fingerprint::new(b"p".to_vec()), None).unwrap();
    engine.accept_shake(w.clone(), parent).unwrap();
    let child = engine.create_child_shake(w.clone(), parent, 100, 10_000, Fingerprint::new(b"c".to_vec())).unwrap();
    engine.accept_shake(s.clone(), child).unwrap();
    engine.deliver_shake(s, child, Fingerprint::new(b"cd".to_vec()), None).unwrap();
    engine.dispute_shake(w, child).unwrap();

    assert_eq!(engine.get_shake(parent).unwrap().dispute_frozen_until(), u64::MAX);
    engine.resolve_dispute(treasury, child, false).unwrap();
    assert_eq!(engine.get_shake(child).unwrap().status(), ShakeStatus::Refunded);
    assert_eq!(engine.get_shake(parent).unwrap().dispute_frozen_until(), 0);
}
