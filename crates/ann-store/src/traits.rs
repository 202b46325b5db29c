use ann_types::StoreEnvelope;

use crate::error::StoreResult;

/// Durable home of a [`StoreEnvelope`].
///
/// All implementations must satisfy these invariants:
/// - `load` on a store that was never saved returns an empty envelope.
/// - `save` replaces the whole document; a failed save leaves the previous
///   document intact.
/// - `load` after a successful `save` returns an envelope equal to the one
///   saved (same records, same order).
pub trait EnvelopeStore {
    /// Load the current envelope.
    fn load(&self) -> StoreResult<StoreEnvelope>;

    /// Replace the stored envelope.
    fn save(&self, envelope: &StoreEnvelope) -> StoreResult<()>;
}

impl<S: EnvelopeStore + ?Sized> EnvelopeStore for &S {
    fn load(&self) -> StoreResult<StoreEnvelope> {
        (**self).load()
    }

    fn save(&self, envelope: &StoreEnvelope) -> StoreResult<()> {
        (**self).save(envelope)
    }
}
