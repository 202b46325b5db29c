use ann_store::{EnvelopeStore, StoreResult};
use ann_types::{AnnotateRequest, AnnotationRecord, StoreEnvelope};
use tracing::debug;

use crate::clock::Clock;
use crate::engine::{MergeEngine, MergeOutcome};

/// Result of a completed load-merge-save cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReport {
    pub outcome: MergeOutcome,
    /// The record as it was written.
    pub record: AnnotationRecord,
    /// The envelope's execution id after the merge (may be empty).
    pub plan_execution_id: String,
}

/// Load the envelope from `store`, apply `request`, and save it back.
///
/// Any load or save failure aborts the cycle; nothing else observes the
/// in-memory envelope, so a failed save simply drops it.
pub fn merge_and_persist<S, C>(
    store: &S,
    engine: &MergeEngine<C>,
    request: &AnnotateRequest,
    execution_id: Option<&str>,
) -> StoreResult<MergeReport>
where
    S: EnvelopeStore + ?Sized,
    C: Clock,
{
    let mut envelope = store.load()?;
    let outcome = engine.apply(&mut envelope, request, execution_id);
    store.save(&envelope)?;
    debug!(
        context = %request.context_name,
        created = outcome.created,
        records = envelope.len(),
        "annotation persisted"
    );

    let StoreEnvelope {
        plan_execution_id,
        mut annotations,
    } = envelope;
    Ok(MergeReport {
        outcome,
        record: annotations.swap_remove(outcome.index),
        plan_execution_id,
    })
}
