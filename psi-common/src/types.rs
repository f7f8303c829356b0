//! # Query Type Definitions
//!
//! Core data types for batched PSI membership queries, shaped around the
//! engine boundary where results travel as parallel arrays.
//!
//! ## Design Principles
//!
//! 1. **Opaque Items**: An item is a caller-chosen `u64`. The client never
//!    hashes, deduplicates, or reorders items; position is the correlation key.
//!
//! 2. **Parallel Arrays at the Boundary Only**: The engine fills one presence
//!    flag and one label per item. `MatchResult` pairs them immediately after
//!    the call so no caller has to keep two indices aligned.
//!
//! 3. **Zeroed Absent Labels**: A label is only meaningful when the item is
//!    present; absent results always carry label 0.
//!
//! ## Boundary Layout Example
//!
//! ```text
//! items:    [ 10 | 20 | 30 ]   u64 per item, count = 3
//! presence: [  0 |  1 |  0 ]   i32 per item, nonzero = match
//! labels:   [  0 | 99 |  ? ]   u64 per item, read only where presence != 0
//!
//! results:  [ (false, 0) | (true, 99) | (false, 0) ]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PsiError, PsiResult};

/// A client-held set element, identified by an opaque 64-bit value.
pub type Item = u64;

/// Presence flag value the engine writes for an unmatched item.
pub const PRESENCE_ABSENT: i32 = 0;

/// Largest batch the engine boundary can carry (its count is a C `int`).
pub const MAX_BATCH_LEN: usize = i32::MAX as usize;

/// Membership outcome for one queried item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the item is in the server's set.
    pub present: bool,
    /// Label associated with the item; zero when absent.
    pub label: u64,
}

impl MatchResult {
    /// Result for an item the server does not hold.
    pub const ABSENT: MatchResult = MatchResult {
        present: false,
        label: 0,
    };

    /// Result for a matched item carrying `label`.
    #[inline]
    pub fn matched(label: u64) -> Self {
        MatchResult {
            present: true,
            label,
        }
    }

    /// Builds a result from the engine's raw presence flag and label slot.
    ///
    /// Any nonzero flag counts as present. The label slot is ignored for
    /// absent items, whatever the engine left there.
    #[inline]
    pub fn from_raw(flag: i32, label: u64) -> Self {
        if flag != PRESENCE_ABSENT {
            MatchResult::matched(label)
        } else {
            MatchResult::ABSENT
        }
    }

    /// Returns the label when present.
    #[inline]
    pub fn label(&self) -> Option<u64> {
        self.present.then_some(self.label)
    }
}

impl From<MatchResult> for (bool, u64) {
    fn from(result: MatchResult) -> Self {
        (result.present, result.label)
    }
}

/// Address and port of a PSI service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Hostname or IP literal.
    pub address: String,
    /// Transport port, never zero.
    pub port: u16,
}

impl Endpoint {
    /// Validates and builds an endpoint.
    ///
    /// # Errors
    /// Returns `PsiError::InvalidArgument` when `address` is blank or `port` is 0.
    pub fn new(address: impl Into<String>, port: u16) -> PsiResult<Self> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(PsiError::invalid_argument("address must not be empty"));
        }
        if port == 0 {
            return Err(PsiError::invalid_argument("port must be in 1..=65535"));
        }
        Ok(Endpoint { address, port })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tcp://{}:{}", self.address, self.port)
    }
}
