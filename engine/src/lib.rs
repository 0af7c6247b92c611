//! Shake Engine
//!
//! A programmable escrow engine: a `shake` is an amount held in custody between a
//! requester and a worker, moving through a small state machine (Pending → Active →
//! Delivered → Released, with a deadline-driven Refunded branch and a Disputed branch
//! adjudicated by a treasury principal). Shakes compose recursively — an accepted
//! worker can hire child shakes out of its own unallocated budget, forming a tree whose
//! settlement cascades bottom-up.
//!
//! # Architecture
//!
//! - **core**: the injectable clock every time-gated transition reads from
//! - **models**: the `Shake` entity, its store, and the opaque `Principal`/`Fingerprint`
//!   identity types
//! - **collaborators**: fixed-interface traits for the external ledger, reputation
//!   sink, and optional dynamic fee policy
//! - **state_machine**: the validated lifecycle transitions and their error type
//! - **subtree**: the cross-shake tree invariants (cleanliness, freeze/unfreeze cascade)
//! - **events**: the append-only audit log
//! - **facade**: `Engine`, the single serialized entry point tying all of the above
//!   together
//!
//! # Critical invariants
//!
//! 1. Custody conservation: the sum of every non-terminal shake's unsettled balance
//!    plus every terminal payout equals what the ledger pulled in.
//! 2. A terminal shake (`Released`/`Refunded`) never transitions again.
//! 3. A parent's children never collectively exceed the budget it hired them from.
//! 4. A disputed descendant freezes every ancestor until the dispute clears.

pub mod collaborators;
pub mod core;
pub mod events;
pub mod facade;
pub mod models;
pub mod state_machine;
pub mod subtree;

pub use collaborators::{DynamicFeePolicy, FeePolicy, LedgerAdapter, ReputationSink, StaticFeePolicy};
pub use core::{Clock, SystemClock, TestClock};
pub use events::{Event, EventLog};
pub use facade::{Engine, EngineConfig};
pub use models::{Fingerprint, Principal, Shake, ShakeId, ShakeStatus, ShakeStore};
pub use state_machine::EngineError;
