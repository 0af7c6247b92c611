//! Ambient infrastructure: the injectable clock.

pub mod clock;

pub use clock::{Clock, SystemClock, TestClock};
