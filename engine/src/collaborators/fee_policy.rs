//! Fee policy: basis-point fee as a function of (amount, depth) (spec §4.1).
//!
//! Generalized from the teacher's trait-object cash-manager policies
//! (`backend/src/policy/mod.rs`, `PolicyConfig` selecting `FifoPolicy` /
//! `LiquidityAwarePolicy` / ... at configuration time) into a single-method trait with
//! a static fallback, since the fee side of this engine needs only one decision rather
//! than a Queue-1 policy DSL.

/// Fee basis points are capped at this value regardless of policy.
pub const MAX_FEE_BPS: u16 = 1000;

/// Default static/base fee, 2.5%.
pub const DEFAULT_BASE_BPS: u16 = 250;

/// Default per-depth premium, 0.25%.
pub const DEFAULT_DEPTH_PREMIUM_BPS: u16 = 25;

/// Computes a basis-point fee for a given (amount, depth) pair.
///
/// `amount` is accepted for implementations that want amount-tiered pricing; the
/// default policy ignores it.
pub trait FeePolicy: Send + Sync {
    fn fee_bps(&self, amount: u64, depth: u64) -> u16;
}

/// Fixed scalar fee, used directly by the engine when no dynamic policy is bound
/// (spec §4.1 "If no dynamic policy is bound to the engine, the engine uses the static
/// scalar `protocol_fee_bps` directly").
#[derive(Debug, Clone, Copy)]
pub struct StaticFeePolicy {
    bps: u16,
}

impl StaticFeePolicy {
    pub fn new(bps: u16) -> Self {
        Self { bps: bps.min(MAX_FEE_BPS) }
    }
}

impl FeePolicy for StaticFeePolicy {
    fn fee_bps(&self, _amount: u64, _depth: u64) -> u16 {
        self.bps
    }
}

/// `bps = base_bps + depth * depth_premium_bps`, clamped to `MAX_FEE_BPS`.
///
/// `base_bps` and `depth_premium_bps` may be updated by the treasury through
/// [`DynamicFeePolicy::set_base_bps`]/[`DynamicFeePolicy::set_depth_premium_bps`], each
/// bounded by the same cap (spec §4.1).
#[derive(Debug)]
pub struct DynamicFeePolicy {
    base_bps: std::sync::atomic::AtomicU16,
    depth_premium_bps: std::sync::atomic::AtomicU16,
}

impl DynamicFeePolicy {
    pub fn new(base_bps: u16, depth_premium_bps: u16) -> Self {
        Self {
            base_bps: std::sync::atomic::AtomicU16::new(base_bps.min(MAX_FEE_BPS)),
            depth_premium_bps: std::sync::atomic::AtomicU16::new(depth_premium_bps.min(MAX_FEE_BPS)),
        }
    }

    pub fn set_base_bps(&self, bps: u16) {
        self.base_bps.store(bps.min(MAX_FEE_BPS), std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_depth_premium_bps(&self, bps: u16) {
        self.depth_premium_bps.store(bps.min(MAX_FEE_BPS), std::sync::atomic::Ordering::SeqCst);
    }
}

impl Default for DynamicFeePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_BPS, DEFAULT_DEPTH_PREMIUM_BPS)
    }
}

impl FeePolicy for DynamicFeePolicy {
    fn fee_bps(&self, _amount: u64, depth: u64) -> u16 {
        let base = self.base_bps.load(std::sync::atomic::Ordering::SeqCst) as u64;
        let premium = self.depth_premium_bps.load(std::sync::atomic::Ordering::SeqCst) as u64;
        let bps = base + depth.saturating_mul(premium);
        bps.min(MAX_FEE_BPS as u64) as u16
    }
}

/// `amount * fee_bps / 10000`, the closed-form fee used by `release_shake` and
/// `resolve_dispute` (spec §4.3). Uses `u128` internally so `amount = u64::MAX` cannot
/// overflow the intermediate product (spec §8 boundary test).
pub fn compute_fee(amount: u64, bps: u16) -> u64 {
    ((amount as u128) * (bps as u128) / 10_000) as u64
}
