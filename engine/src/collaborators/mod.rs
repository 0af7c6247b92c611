//! External collaborator interfaces (spec §6): the ledger, the reputation sink, and the
//! optional dynamic fee policy. All three are fixed-interface traits the engine depends
//! on but does not implement for production use — callers bind real adapters.

pub mod fee_policy;
pub mod ledger;
pub mod reputation;

pub use fee_policy::{compute_fee, DynamicFeePolicy, FeePolicy, StaticFeePolicy, MAX_FEE_BPS};
pub use ledger::{LedgerAdapter, LedgerError};
pub use reputation::{ReputationError, ReputationSink};
