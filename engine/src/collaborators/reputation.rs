//! Reputation sink: an advisory, append-only side channel (spec §6, §7).
//!
//! The engine calls `record` exactly once per terminal outcome of a shake whose worker
//! is set. Sink failures never fail the settling operation — they are swallowed and
//! logged at `warn`, since the reputation ledger sits outside the money-path invariants.

use crate::models::principal::Principal;

/// Receives post-settlement outcome records.
///
/// Implementations should be idempotent per shake if they can be called more than once
/// for the same outcome, but the engine itself only ever calls this once per terminal
/// transition.
pub trait ReputationSink: Send + Sync {
    /// Record that `worker` earned `earned_units` (0 on an unsuccessful outcome) and
    /// whether the shake settled successfully.
    fn record(&self, worker: &Principal, earned_units: u64, success: bool) -> Result<(), ReputationError>;
}

/// Sink failure. Advisory only — see module docs.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("reputation sink failed to record outcome")]
pub struct ReputationError;

impl<T: ReputationSink + ?Sized> ReputationSink for std::sync::Arc<T> {
    fn record(&self, worker: &Principal, earned_units: u64, success: bool) -> Result<(), ReputationError> {
        (**self).record(worker, earned_units, success)
    }
}

/// In-memory reputation doubles shared by unit and integration tests (see
/// `collaborators::ledger::test_support` for why this isn't `#[cfg(test)]`-gated).
pub mod test_support {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedOutcome {
        pub worker: Principal,
        pub earned_units: u64,
        pub success: bool,
    }

    #[derive(Default)]
    pub struct RecordingSink {
        pub records: Mutex<Vec<RecordedOutcome>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn records(&self) -> Vec<RecordedOutcome> {
            self.records.lock().unwrap().clone()
        }
    }

    impl ReputationSink for RecordingSink {
        fn record(&self, worker: &Principal, earned_units: u64, success: bool) -> Result<(), ReputationError> {
            self.records.lock().unwrap().push(RecordedOutcome {
                worker: worker.clone(),
                earned_units,
                success,
            });
            Ok(())
        }
    }

    /// A sink that always fails, for exercising the swallow-and-log path.
    #[derive(Default)]
    pub struct FailingSink;

    impl ReputationSink for FailingSink {
        fn record(&self, _worker: &Principal, _earned_units: u64, _success: bool) -> Result<(), ReputationError> {
            Err(ReputationError)
        }
    }

    #[test]
    fn recording_sink_captures_outcomes_in_order() {
        let sink = RecordingSink::new();
        let w = Principal::from("w");
        sink.record(&w, 100, true).unwrap();
        sink.record(&w, 0, false).unwrap();
        assert_eq!(
            sink.records(),
            vec![
                RecordedOutcome { worker: w.clone(), earned_units: 100, success: true },
                RecordedOutcome { worker: w, earned_units: 0, success: false },
            ]
        );
    }
}
