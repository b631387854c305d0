//! Context ledger: links live contexts back to the cause that produced them.
//!
//! Rendering a `{cause}` token needs the failure that was active when the
//! context was staged, but contexts do not own their causes. The ledger keeps
//! a small ring of `(context, cause)` pairs keyed by [`ContextId`] so the
//! renderer can find it later.
//!
//! The ring is bounded and best-effort: when full, the oldest pair is
//! evicted, and a lookup for an evicted context simply finds nothing. All
//! access goes through one lock because staging happens as a side effect of
//! message rendering, from any thread.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::trace;

use crate::context::{Context, ContextId};
use crate::fault::Fault;

/// Default number of pairs the ledger retains.
pub const DEFAULT_LEDGER_CAPACITY: usize = 5;

lazy_static! {
    static ref GLOBAL_LEDGER: ContextLedger = ContextLedger::new(DEFAULT_LEDGER_CAPACITY);
}

/// One staged pair.
#[derive(Clone, Debug)]
pub struct LedgerEntry {
    pub context: ContextId,
    pub cause: Arc<Fault>,
    pub staged_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Ring {
    capacity: usize,
    entries: VecDeque<LedgerEntry>,
}

/// Bounded, identity-keyed table of context → cause.
#[derive(Debug)]
pub struct ContextLedger {
    ring: Mutex<Ring>,
}

impl ContextLedger {
    /// Create a ledger holding at most `capacity` pairs (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: Mutex::new(Ring {
                capacity,
                entries: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// A one-pair ledger, used to render against a cause that is known
    /// up front without racing evictions in the global ring.
    pub fn single(context: &Context, cause: &Arc<Fault>) -> Self {
        let ledger = Self::new(1);
        ledger.stage(context, cause);
        ledger
    }

    /// The process-wide ledger used by message rendering.
    pub fn global() -> &'static ContextLedger {
        &GLOBAL_LEDGER
    }

    /// Stage a pair unless this context is already present.
    ///
    /// Evicts the oldest pair when the ring is full.
    pub fn stage(&self, context: &Context, cause: &Arc<Fault>) {
        let id = context.id();
        let mut ring = self.ring.lock();
        if ring.entries.iter().any(|e| e.context == id) {
            return;
        }
        if ring.entries.len() >= ring.capacity {
            if let Some(evicted) = ring.entries.pop_front() {
                trace!(context = %evicted.context, "Ledger full, evicted oldest context");
            }
        }
        ring.entries.push_back(LedgerEntry {
            context: id,
            cause: Arc::clone(cause),
            staged_at: Utc::now(),
        });
        trace!(context = %id, staged = ring.entries.len(), "Context staged");
    }

    /// Stage a pair when both halves are present.
    pub fn stage_opt(&self, context: Option<&Context>, cause: Option<&Arc<Fault>>) {
        if let (Some(context), Some(cause)) = (context, cause) {
            self.stage(context, cause);
        }
    }

    /// The cause staged for this context, if still retained.
    pub fn cause(&self, context: &Context) -> Option<Arc<Fault>> {
        self.cause_for(context.id())
    }

    /// Lookup by id.
    pub fn cause_for(&self, id: ContextId) -> Option<Arc<Fault>> {
        self.ring
            .lock()
            .entries
            .iter()
            .find(|e| e.context == id)
            .map(|e| Arc::clone(&e.cause))
    }

    /// Change capacity, evicting the oldest pairs if the ring shrinks.
    pub fn set_capacity(&self, capacity: usize) {
        let capacity = capacity.max(1);
        let mut ring = self.ring.lock();
        ring.capacity = capacity;
        while ring.entries.len() > capacity {
            ring.entries.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity
    }

    pub fn len(&self) -> usize {
        self.ring.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.lock().entries.is_empty()
    }

    /// Snapshot of retained pairs, oldest first.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.ring.lock().entries.iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.ring.lock().entries.clear();
    }
}

impl Default for ContextLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }
}
