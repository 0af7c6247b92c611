//! Opaque principal identity.
//!
//! The engine never interprets the structure of an identity — not its key scheme, not
//! its chain of custody — it only needs one to be equatable, orderable (so it can key a
//! `BTreeMap` and sort deterministically in logs), cloneable, and hashable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A byte-addressable identity: a requester, a worker, or the treasury.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(Vec<u8>);

impl Principal {
    /// Wrap raw identity bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Principal {
    /// Convenience conversion for tests and simple deployments that identify
    /// principals by a human-readable name; the bytes are the UTF-8 encoding.
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", hex::encode(&self.0))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
