//! # In-Memory Engine
//!
//! Provide an in-process receiver engine that answers membership queries
//! against a labelled set held by a `MemorySender`, with no cryptography and
//! no transport.
//!
//! ## Usage
//!
//! - Use `MemorySender::bind` to create the server side at an endpoint, then
//!   `insert` labelled items into it.
//! - Use `MemorySender::receiver` to get a `MemoryEngine` for a client. Each
//!   engine holds its own session; several engines can share one sender.
//! - Use `set_accepting`, `drop_sessions`, and `set_faulted` to reproduce
//!   refused connections, server-side drops, and failed batches.
//!
//! ## Design Principles
//!
//! 1. **Shared Sender, Private Sessions**: The sender is an `Arc` handle so
//!    tests and engines see the same set; sessions live in each engine.
//! 2. **Generation Counter**: Dropping sessions bumps a generation, and an
//!    engine is live only while its session generation is current. This is
//!    how `is_connected` observes a drop it did not initiate.
//! 3. **Native Semantics**: Connect refuses while a session exists, and a
//!    batch is all-or-nothing, matching the native receiver exports.
//!
//! ## Structure Overview
//!
//! ```text
//! MemorySender (Clone)
//!   └── inner: Arc<SenderInner>
//!         ├── endpoint: Endpoint
//!         ├── set: RwLock<HashMap<Item, label>>
//!         ├── accepting / faulted: AtomicBool
//!         └── generation / round_trips: AtomicU64
//!
//! MemoryEngine
//!   ├── sender: MemorySender
//!   └── session: Option<generation>
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use ahash::RandomState;
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use psi_common::{Endpoint, Item};

use crate::engine::PsiEngine;

struct SenderInner {
    endpoint: Endpoint,
    // Item -> label. Unlabelled items map to 0.
    set: RwLock<HashMap<Item, u64, RandomState>>,
    accepting: AtomicBool,
    faulted: AtomicBool,
    generation: AtomicU64,
    round_trips: AtomicU64,
}

/// Server side of the in-memory engine: a labelled set bound to an endpoint.
#[derive(Clone)]
pub struct MemorySender {
    inner: Arc<SenderInner>,
}

impl MemorySender {
    /// Creates an empty sender that accepts sessions at `endpoint`.
    pub fn bind(endpoint: Endpoint) -> Self {
        MemorySender {
            inner: Arc::new(SenderInner {
                endpoint,
                set: RwLock::new(HashMap::with_hasher(RandomState::new())),
                accepting: AtomicBool::new(true),
                faulted: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                round_trips: AtomicU64::new(0),
            }),
        }
    }

    /// Endpoint this sender accepts sessions at.
    pub fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    /// Returns a new receiver engine with no session.
    pub fn receiver(&self) -> MemoryEngine {
        MemoryEngine {
            sender: self.clone(),
            session: None,
        }
    }

    /// Adds `item` with `label`, replacing any previous label.
    pub fn insert(&self, item: Item, label: u64) {
        self.inner.set.write().insert(item, label);
    }

    /// Adds `item` with no label (reported as label 0).
    pub fn insert_unlabeled(&self, item: Item) {
        self.insert(item, 0);
    }

    /// Removes `item`. Returns true when it was present.
    pub fn remove(&self, item: Item) -> bool {
        self.inner.set.write().remove(&item).is_some()
    }

    /// Returns true when `item` is in the set.
    pub fn contains(&self, item: Item) -> bool {
        self.inner.set.read().contains_key(&item)
    }

    /// Number of items in the set.
    pub fn len(&self) -> usize {
        self.inner.set.read().len()
    }

    /// Returns true when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.set.read().is_empty()
    }

    /// Accepts or refuses new sessions. Existing sessions are unaffected.
    pub fn set_accepting(&self, accepting: bool) {
        self.inner.accepting.store(accepting, Ordering::Release);
    }

    /// When faulted, every batch fails after partially writing its buffers.
    pub fn set_faulted(&self, faulted: bool) {
        self.inner.faulted.store(faulted, Ordering::Release);
    }

    /// Drops every live session, as if the server closed them.
    pub fn drop_sessions(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "memory sender dropped all sessions");
    }

    /// Number of batches that reached the sender.
    pub fn round_trips(&self) -> u64 {
        self.inner.round_trips.load(Ordering::Relaxed)
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }
}

impl Extend<(Item, u64)> for MemorySender {
    fn extend<T: IntoIterator<Item = (Item, u64)>>(&mut self, iter: T) {
        let mut set = self.inner.set.write();
        for (item, label) in iter {
            set.insert(item, label);
        }
    }
}

/// Receiver engine talking to a `MemorySender` in the same process.
pub struct MemoryEngine {
    sender: MemorySender,
    // Generation observed at connect; `None` when no session exists.
    session: Option<u64>,
}

impl MemoryEngine {
    /// Sender this engine connects to.
    pub fn sender(&self) -> &MemorySender {
        &self.sender
    }
}

impl PsiEngine for MemoryEngine {
    fn connect(&mut self, address: &str, port: u16) -> bool {
        if self.session.is_some() {
            return false;
        }
        if !self.sender.inner.accepting.load(Ordering::Acquire) {
            return false;
        }
        let endpoint = self.sender.endpoint();
        if endpoint.address != address || endpoint.port != port {
            return false;
        }

        self.session = Some(self.sender.generation());
        true
    }

    fn disconnect(&mut self) {
        self.session = None;
    }

    fn is_connected(&self) -> bool {
        self.session == Some(self.sender.generation())
    }

    fn batch_query(&mut self, items: &[Item], presence: &mut [i32], labels: &mut [u64]) -> bool {
        if presence.len() != items.len() || labels.len() != items.len() {
            return false;
        }
        if !self.is_connected() {
            return false;
        }

        self.sender.inner.round_trips.fetch_add(1, Ordering::Relaxed);
        let faulted = self.sender.inner.faulted.load(Ordering::Acquire);
        // A faulted sender fails halfway through, leaving the buffers dirty.
        let answered = if faulted { items.len() / 2 } else { items.len() };

        let set = self.sender.inner.set.read();
        for (idx, item) in items.iter().take(answered).enumerate() {
            if let Some(&label) = set.get(item) {
                presence[idx] = 1;
                labels[idx] = label;
            }
        }

        trace!(count = items.len(), faulted, "memory sender answered batch");
        !faulted
    }
}
