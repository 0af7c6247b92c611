//! Time source for the engine.
//!
//! Every time-gated transition (deadlines, the dispute window, the freeze sentinel)
//! reads "now" from an injected `Clock` rather than the wall clock directly. Production
//! code binds `SystemClock`; tests bind `TestClock` and advance it deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A monotonic source of "now", expressed as seconds since the Unix epoch.
///
/// Implementations must be `Send + Sync` so a single `Engine` can be shared across
/// threads behind its facade lock.
pub trait Clock: Send + Sync {
    /// Current time, in seconds.
    fn now(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Wall-clock time source used in production.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs()
    }
}

/// Deterministic, manually-advanced clock for tests.
///
/// # Example
/// ```
/// use shake_engine::core::clock::{Clock, TestClock};
///
/// let clock = TestClock::new(1_000);
/// assert_eq!(clock.now(), 1_000);
/// clock.advance(50);
/// assert_eq!(clock.now(), 1_050);
/// ```
#[derive(Debug)]
pub struct TestClock {
    now: AtomicU64,
}

impl TestClock {
    /// Create a clock starting at `start` seconds.
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Advance the clock by `delta` seconds.
    pub fn advance(&self, delta: u64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, at: u64) {
        self.now.store(at, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
