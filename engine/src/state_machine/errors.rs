//! `EngineError`: one stable, enumerable tag per failure in spec §7.
//!
//! Generalized from the teacher's per-module error enums (`TransactionError` in
//! `backend/src/models/transaction.rs`, `SettlementError` in
//! `backend/src/settlement/rtgs.rs`) collapsed into a single crate-boundary enum, since
//! spec §7 calls for "a stable, enumerable tag" returned "from every operation" rather
//! than a per-module taxonomy. Timing variants carry `now` and the relevant boundary,
//! per §7's debuggability requirement.

use thiserror::Error;

use crate::collaborators::ledger::LedgerError;
use crate::models::shake::ShakeId;

/// Every failure the engine can return from a public operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    // -- precondition violations --
    #[error("amount must be positive")]
    AmountZero,

    #[error("deadline_duration must be positive")]
    DeadlineZero,

    #[error("shake {id} is not Pending")]
    NotPending { id: ShakeId },

    #[error("shake {id} is not Active")]
    NotActive { id: ShakeId },

    #[error("shake {id} is not Delivered")]
    NotDelivered { id: ShakeId },

    #[error("shake {id} is not Disputed")]
    NotDisputed { id: ShakeId },

    #[error("shake {id} already has a worker")]
    AlreadyAccepted { id: ShakeId },

    #[error("caller is not the worker of shake {id}")]
    NotWorker { id: ShakeId },

    #[error("caller is not the requester of shake {id}")]
    NotRequester { id: ShakeId },

    #[error("caller is not the treasury")]
    NotTreasury,

    #[error("caller is not the worker of parent shake {parent_id}")]
    NotParentWorker { parent_id: ShakeId },

    #[error("parent shake {parent_id} is not Active")]
    ParentNotActive { parent_id: ShakeId },

    #[error("requested {requested} exceeds available parent budget {available}")]
    ExceedsParentBudget { requested: u64, available: u64 },

    #[error("shake {id} cannot be refunded from its current status")]
    CannotRefund { id: ShakeId },

    // -- timing violations --
    #[error("deadline already passed: now={now}, deadline_at={deadline_at}")]
    DeadlinePassed { now: u64, deadline_at: u64 },

    #[error("deadline has not passed yet: now={now}, deadline_at={deadline_at}")]
    DeadlineNotPassed { now: u64, deadline_at: u64 },

    #[error("dispute window still active: now={now}, window_end={window_end}")]
    DisputeWindowActive { now: u64, window_end: u64 },

    #[error("dispute window closed: now={now}, window_closed_at={window_closed_at}")]
    DisputeWindowClosed { now: u64, window_closed_at: u64 },

    // -- subtree/cascade violations --
    #[error("child shake {child_id} of {parent_id} is not settled")]
    ChildrenNotSettled { parent_id: ShakeId, child_id: ShakeId },

    #[error("subtree rooted at {id} is not clean: a descendant is Disputed")]
    SubtreeNotClean { id: ShakeId },

    // -- ledger failures --
    #[error("ledger pull failed: {0}")]
    LedgerPullFailed(LedgerError),

    #[error("ledger push failed: {0}")]
    LedgerPushFailed(LedgerError),

    // -- lookup failures --
    #[error("no such shake: {id}")]
    ShakeNotFound { id: ShakeId },
}
