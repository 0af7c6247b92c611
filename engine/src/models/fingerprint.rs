//! Opaque byte digests used for task and delivery fingerprints.
//!
//! The engine compares these for equality only where the spec calls for it — it never
//! hashes, parses, or otherwise interprets the bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque digest: a task fingerprint, a delivery fingerprint, a pubkey hash, or an
/// encrypted delivery key blob.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", hex::encode(&self.0))
    }
}
