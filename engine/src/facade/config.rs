//! Immutable, constructor-time engine configuration (spec §6).

use crate::models::principal::Principal;

/// Seconds in 48 hours, the default dispute window (spec §6).
pub const DEFAULT_DISPUTE_WINDOW_SECS: u64 = 48 * 60 * 60;

/// Sentinel written to `dispute_frozen_until` while an ancestor is frozen: effectively
/// "never" for any realistic `now`, so a frozen ancestor can never clear its own window
/// by elapsed time alone (spec §4.4 invariant #6) — only `unfreeze_ancestors` clears it.
pub const DEFAULT_TIME_CEILING: u64 = u64::MAX;

/// Engine-wide configuration, immutable for the engine's lifetime (spec §6).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Duration of the post-delivery window in which only the requester may release or
    /// dispute a shake.
    pub dispute_window: u64,
    /// Static fee applied when no dynamic [`crate::collaborators::FeePolicy`] is bound.
    pub protocol_fee_bps: u16,
    /// Principal receiving protocol fees and authorized to resolve disputes.
    pub treasury: Principal,
    /// Value written to `dispute_frozen_until` while an ancestor is frozen.
    pub time_ceiling: u64,
}

impl EngineConfig {
    pub fn new(treasury: Principal) -> Self {
        Self {
            dispute_window: DEFAULT_DISPUTE_WINDOW_SECS,
            protocol_fee_bps: crate::collaborators::fee_policy::DEFAULT_BASE_BPS,
            treasury,
            time_ceiling: DEFAULT_TIME_CEILING,
        }
    }
}
