// psi-common - Shared types and error definitions for the PSI receiver client
//
// This crate defines the values that cross the client/engine boundary

pub mod error;
pub mod types;

// Re-export for convenience
pub use error::*;
pub use types::*;
