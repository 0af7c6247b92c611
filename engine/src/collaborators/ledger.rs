//! Ledger adapter: the stablecoin balance/transfer collaborator (spec §4.2, §6).
//!
//! The ledger itself — balances, approvals, transfers — is explicitly out of scope
//! (spec §1); the engine only ever sees this narrow capability surface. Generalized
//! from the teacher's in-process `Agent::debit`/`Agent::credit` (`backend/src/models/agent.rs`)
//! into a trait boundary, since here the ledger is a genuinely external collaborator.

use thiserror::Error;

use crate::models::principal::Principal;

/// Failure modes a ledger adapter may report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient allowance: {principal} has not approved enough spend")]
    InsufficientAllowance { principal: Principal },

    #[error("insufficient balance: {principal} holds less than the requested amount")]
    InsufficientBalance { principal: Principal },

    #[error("underlying ledger transfer failed")]
    TransferFailed,
}

/// Capability surface the engine uses to move custody of stablecoin units.
///
/// All operations are all-or-nothing and expected to be idempotent within one
/// committed engine transaction (spec §4.2).
pub trait LedgerAdapter: Send + Sync {
    /// Move `amount` from `from`'s balance into the engine's custody.
    fn pull(&self, from: &Principal, amount: u64) -> Result<(), LedgerError>;

    /// Move `amount` out of the engine's custody to `to`.
    fn push(&self, to: &Principal, amount: u64) -> Result<(), LedgerError>;

    /// The engine's own custodied balance, for sanity checks (invariant #4).
    fn custody_balance(&self) -> u64;
}

impl<T: LedgerAdapter + ?Sized> LedgerAdapter for std::sync::Arc<T> {
    fn pull(&self, from: &Principal, amount: u64) -> Result<(), LedgerError> {
        (**self).pull(from, amount)
    }

    fn push(&self, to: &Principal, amount: u64) -> Result<(), LedgerError> {
        (**self).push(to, amount)
    }

    fn custody_balance(&self) -> u64 {
        (**self).custody_balance()
    }
}

/// An in-memory ledger double used across the integration test suite. Not
/// `#[cfg(test)]`-gated so `tests/` integration files (which build this crate as an
/// ordinary dependency) can reach it too.
pub mod test_support {

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryLedger {
        balances: Mutex<HashMap<Principal, u64>>,
        custody: Mutex<u64>,
    }

    impl InMemoryLedger {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fund(&self, principal: &Principal, amount: u64) {
            *self.balances.lock().unwrap().entry(principal.clone()).or_insert(0) += amount;
        }

        pub fn balance_of(&self, principal: &Principal) -> u64 {
            *self.balances.lock().unwrap().get(principal).unwrap_or(&0)
        }
    }

    impl LedgerAdapter for InMemoryLedger {
        fn pull(&self, from: &Principal, amount: u64) -> Result<(), LedgerError> {
            let mut balances = self.balances.lock().unwrap();
            let balance = balances.entry(from.clone()).or_insert(0);
            if *balance < amount {
                return Err(LedgerError::InsufficientBalance { principal: from.clone() });
            }
            *balance -= amount;
            *self.custody.lock().unwrap() += amount;
            Ok(())
        }

        fn push(&self, to: &Principal, amount: u64) -> Result<(), LedgerError> {
            let mut custody = self.custody.lock().unwrap();
            if *custody < amount {
                return Err(LedgerError::TransferFailed);
            }
            *custody -= amount;
            *self.balances.lock().unwrap().entry(to.clone()).or_insert(0) += amount;
            Ok(())
        }

        fn custody_balance(&self) -> u64 {
            *self.custody.lock().unwrap()
        }
    }

    #[test]
    fn pull_then_push_conserves_total() {
        let ledger = InMemoryLedger::new();
        let alice = Principal::from("alice");
        let bob = Principal::from("bob");
        ledger.fund(&alice, 1_000);

        ledger.pull(&alice, 400).unwrap();
        assert_eq!(ledger.custody_balance(), 400);

        ledger.push(&bob, 400).unwrap();
        assert_eq!(ledger.custody_balance(), 0);
        assert_eq!(ledger.balance_of(&bob), 400);
    }

    #[test]
    fn pull_beyond_balance_fails() {
        let ledger = InMemoryLedger::new();
        let alice = Principal::from("alice");
        ledger.fund(&alice, 100);
        assert_eq!(
            ledger.pull(&alice, 200),
            Err(LedgerError::InsufficientBalance { principal: alice })
        );
    }
}
