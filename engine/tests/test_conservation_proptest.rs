//! Property-based checks for the conservation/monotonicity invariants (spec §8 P1-P4)
//! run over randomized sequences of valid operations against a single root shake and
//! its children.

use std::sync::Arc;

use proptest::prelude::*;

use shake_engine::collaborators::ledger::test_support::InMemoryLedger;
use shake_engine::collaborators::reputation::test_support::RecordingSink;
use shake_engine::{Engine, EngineConfig, Fingerprint, Principal, ShakeStatus, TestClock};

mod common;

#[derive(Debug, Clone)]
enum Op {
    HireChild { amount: u64 },
    DeliverAndReleaseChild { index: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..=50).prop_map(|amount| Op::HireChild { amount }),
        (0usize..8).prop_map(|index| Op::DeliverAndReleaseChild { index }),
    ]
}

proptest! {
    /// P1/P2: custody never goes negative and every committed child hire stays within
    /// the parent's declared budget, however the operations are interleaved.
    #[test]
    fn child_budget_never_oversubscribed(ops in prop::collection::vec(op_strategy(), 0..30)) {
        common::init_tracing();
        let r = Principal::from("r");
        let w = Principal::from("w");
        let root_amount = 1_000u64;

        let clock = Arc::new(TestClock::new(0));
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.fund(&r, root_amount);
        let engine = Engine::new(
            EngineConfig::new(Principal::from("treasury")),
            Box::new(Arc::clone(&ledger)),
            Box::new(RecordingSink::new()),
            Box::new(clock),
        );

        let root = engine.create_shake(r, root_amount, 1_000_000, Fingerprint::new(b"root".to_vec()), None).unwrap();
        engine.accept_shake(w.clone(), root).unwrap();

        let mut children = Vec::new();
        for op in ops {
            match op {
                Op::HireChild { amount } => {
                    let remaining = engine.remaining_of(root).unwrap();
                    let result = engine.create_child_shake(w.clone(), root, amount, 1_000_000, Fingerprint::new(b"c".to_vec()));
                    if amount <= remaining {
                        let child = result.expect("amount within budget must be accepted");
                        children.push(child);
                        prop_assert!(engine.remaining_of(root).unwrap() <= remaining);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::DeliverAndReleaseChild { index } => {
                    if let Some(&child) = children.get(index) {
                        let sub_worker = Principal::from("sub");
                        let accepted = engine.accept_shake(sub_worker.clone(), child).is_ok();
                        if accepted {
                            engine.deliver_shake(sub_worker, child, Fingerprint::new(b"d".to_vec()), None).unwrap();
                            engine.release_shake(w.clone(), child).unwrap();
                        }
                    }
                }
            }
        }

        // P2: the budget scalar is never negative (it's unsigned, so this also holds by
        // construction, but assert the closed-form relationship directly).
        let remaining = engine.remaining_of(root).unwrap();
        prop_assert!(remaining <= root_amount);

        // P4: every terminal child stays terminal for the rest of the run.
        for &child in &children {
            let status = engine.get_shake(child).unwrap().status();
            if status.is_terminal() {
                prop_assert!(matches!(status, ShakeStatus::Released | ShakeStatus::Refunded));
            }
        }
    }
}

proptest! {
    /// P4: once a shake reaches a terminal status, repeated attempts to mutate it
    /// always fail rather than silently succeeding.
    #[test]
    fn terminal_shake_rejects_every_further_operation(amount in 1u64..=10_000u64) {
        common::init_tracing();
        let r = Principal::from("r");
        let w = Principal::from("w");
        let clock = Arc::new(TestClock::new(0));
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.fund(&r, amount);
        let engine = Engine::new(
            EngineConfig::new(Principal::from("treasury")),
            Box::new(Arc::clone(&ledger)),
            Box::new(RecordingSink::new()),
            Box::new(clock),
        );

        let id = engine.create_shake(r.clone(), amount, 100, Fingerprint::new(b"t".to_vec()), None).unwrap();
        engine.accept_shake(w.clone(), id).unwrap();
        engine.deliver_shake(w, id, Fingerprint::new(b"d".to_vec()), None).unwrap();
        engine.release_shake(r, id).unwrap();

        prop_assert!(engine.accept_shake(Principal::from("w2"), id).is_err());
        prop_assert!(engine.deliver_shake(Principal::from("w2"), id, Fingerprint::new(b"d2".to_vec()), None).is_err());
        prop_assert!(engine.release_shake(Principal::from("anyone"), id).is_err());
        prop_assert!(engine.refund_shake(id).is_err());
        prop_assert_eq!(engine.get_shake(id).unwrap().status(), ShakeStatus::Released);
    }
}
