//! Domain models for the shake engine.

pub mod fingerprint;
pub mod principal;
pub mod shake;
pub mod store;

pub use fingerprint::Fingerprint;
pub use principal::Principal;
pub use shake::{Shake, ShakeId, ShakeStatus};
pub use store::ShakeStore;
