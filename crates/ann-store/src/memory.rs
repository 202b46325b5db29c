use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use ann_types::StoreEnvelope;

use crate::error::{StoreError, StoreResult};
use crate::traits::EnvelopeStore;

/// In-memory envelope store.
///
/// Intended for tests and embedding. The envelope is held behind a `RwLock`
/// and cloned on load/save. Saves can be made to fail on demand to exercise
/// the persistence-failure path of callers.
pub struct InMemoryEnvelopeStore {
    envelope: RwLock<Option<StoreEnvelope>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryEnvelopeStore {
    /// Create a store that has never been saved.
    pub fn new() -> Self {
        Self {
            envelope: RwLock::new(None),
            saves: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Create a store pre-seeded with `envelope`.
    pub fn with_envelope(envelope: StoreEnvelope) -> Self {
        let store = Self::new();
        *store.envelope.write().expect("lock poisoned") = Some(envelope);
        store
    }

    /// The currently stored envelope, if any save (or seed) happened.
    pub fn snapshot(&self) -> Option<StoreEnvelope> {
        self.envelope.read().expect("lock poisoned").clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemoryEnvelopeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeStore for InMemoryEnvelopeStore {
    fn load(&self) -> StoreResult<StoreEnvelope> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, envelope: &StoreEnvelope) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("saves disabled".into()));
        }
        *self.envelope.write().expect("lock poisoned") = Some(envelope.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryEnvelopeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let records = self.snapshot().map(|e| e.len()).unwrap_or(0);
        f.debug_struct("InMemoryEnvelopeStore")
            .field("record_count", &records)
            .field("save_count", &self.save_count())
            .finish()
    }
}
