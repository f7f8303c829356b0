//! # PSI Receiver Client
//!
//! Purpose: Provide a small, synchronous facade for connecting to a Private
//! Set Intersection service and running batched membership queries.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `PsiClient` hides the engine's boolean boundary and
//!    parallel result buffers behind typed results.
//! 2. **Injected Engine**: The client owns a `PsiEngine` value, so tests swap
//!    in `MemoryEngine` and several clients can coexist.
//! 3. **One Round Trip per Batch**: A query is a single engine call no matter
//!    how many items it carries.
//! 4. **All or Nothing**: A failed batch yields an error, never partial results.

mod client;
mod config;

pub use client::PsiClient;
pub use config::ClientConfig;

pub use psi_common::{Endpoint, Item, MatchResult, PsiError, PsiResult};
pub use psi_engine::{MemoryEngine, MemorySender, PsiEngine};
#[cfg(feature = "native")]
pub use psi_engine::NativeEngine;
