//! # Engine Capability
//!
//! The four primitives a receiver engine must provide. Calls are blocking and
//! take `&mut self` where they touch the session, so a single engine is never
//! driven from two places at once.

use psi_common::Item;

/// Membership-query engine reached over a session it manages itself.
pub trait PsiEngine {
    /// Establishes a session with `address:port`.
    ///
    /// Returns false when no session was created (unreachable host, refused
    /// connection, or a session already active).
    fn connect(&mut self, address: &str, port: u16) -> bool;

    /// Tears down the active session. Safe to call with none active.
    fn disconnect(&mut self);

    /// Live session status, including drops observed since `connect`.
    fn is_connected(&self) -> bool;

    /// Queries every item in one round trip.
    ///
    /// `presence` and `labels` have the same length as `items` and arrive
    /// zeroed. On success, `presence[i]` is nonzero when `items[i]` matched
    /// and `labels[i]` then holds its label. Returning false means the whole
    /// batch failed; the contents of both buffers are unspecified.
    fn batch_query(&mut self, items: &[Item], presence: &mut [i32], labels: &mut [u64]) -> bool;
}

impl<E: PsiEngine + ?Sized> PsiEngine for Box<E> {
    fn connect(&mut self, address: &str, port: u16) -> bool {
        (**self).connect(address, port)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn batch_query(&mut self, items: &[Item], presence: &mut [i32], labels: &mut [u64]) -> bool {
        (**self).batch_query(items, presence, labels)
    }
}
