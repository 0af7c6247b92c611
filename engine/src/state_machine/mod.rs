//! The shake lifecycle: validated transitions over [`crate::models::store::ShakeStore`]
//! and the single error type they return.

pub mod errors;
pub mod transitions;

pub use errors::EngineError;
pub use transitions::{
    accept_shake, create_child_shake, create_shake, deliver_shake, dispute_shake, refund_shake, release_shake,
    resolve_dispute, ReleaseOutcome, RefundOutcome, ResolveOutcome,
};
