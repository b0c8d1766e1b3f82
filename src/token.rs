//! Per-run ordering token.
//!
//! The token is the single synchronization marker a run leaves behind: every
//! upserted document carries it, and the end-of-run purge deletes documents
//! whose last-seen token is older. The index compares tokens numerically;
//! this crate treats the value as opaque beyond minting it.

use chrono::Utc;
use std::fmt;

/// Opaque 64-bit ordering token, minted once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderingToken(u64);

impl OrderingToken {
    /// Mints the token for a run from the wall clock (milliseconds since the
    /// Unix epoch). Consecutive runs on a well-behaved clock get increasing
    /// tokens; strict monotonicity under clock skew is NOT guaranteed here —
    /// callers that need it must inject a token via [`OrderingToken::from_raw`]
    /// from a source that documents that guarantee.
    pub fn mint() -> Self {
        Self(Utc::now().timestamp_millis().max(0) as u64)
    }

    /// Wraps an externally supplied token value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
