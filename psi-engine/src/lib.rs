//! # PSI Receiver Engines
//!
//! Purpose: Define the capability the receiver client drives, plus the
//! engines that implement it.
//!
//! ## Design Principles
//! 1. **Strategy Pattern**: `PsiEngine` keeps the client decoupled from how
//!    membership is actually computed.
//! 2. **Boolean Boundary**: Engines report success as a flag, exactly like the
//!    native receiver exports; typed errors are the client's job.
//! 3. **Instance Handles**: Every engine is a value the client owns, never a
//!    process-wide global reached by name.
//!
//! ## Engines
//! - `MemoryEngine`: in-process engine backed by a `MemorySender` holding a
//!   labelled set. Used for embedding tests and local development.
//! - `NativeEngine` (feature `native`): binds the native receiver library.

mod engine;
mod memory;
#[cfg(feature = "native")]
mod native;

pub use engine::PsiEngine;
pub use memory::{MemoryEngine, MemorySender};
#[cfg(feature = "native")]
pub use native::NativeEngine;
