use ann_types::{AnnotateRequest, AnnotationRecord, Mode, StoreEnvelope};
use tracing::debug;

use crate::clock::{format_timestamp, Clock, SystemClock};

/// What [`MergeEngine::apply`] did to the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Position of the touched record in the envelope.
    pub index: usize,
    /// `true` if the record did not exist before.
    pub created: bool,
    /// The policy that was applied.
    pub mode: Mode,
}

/// Applies annotate requests to an in-memory envelope.
///
/// The engine never performs I/O; see [`merge_and_persist`] for the
/// load-apply-save cycle.
///
/// [`merge_and_persist`]: crate::persist::merge_and_persist
#[derive(Clone, Debug, Default)]
pub struct MergeEngine<C = SystemClock> {
    clock: C,
}

impl MergeEngine<SystemClock> {
    /// Engine stamping records with wall-clock time.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> MergeEngine<C> {
    /// Engine stamping records with `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Apply `request` to `envelope`.
    ///
    /// `execution_id` is recorded as the envelope's plan execution id only if
    /// none is set yet. The record for the request's context is created at
    /// the end of the list if missing, otherwise updated in place.
    pub fn apply(
        &self,
        envelope: &mut StoreEnvelope,
        request: &AnnotateRequest,
        execution_id: Option<&str>,
    ) -> MergeOutcome {
        if !envelope.has_execution_id() {
            if let Some(id) = execution_id.filter(|id| !id.trim().is_empty()) {
                debug!(execution_id = id, "recording plan execution id");
                envelope.plan_execution_id = id.to_string();
            }
        }

        let timestamp = format_timestamp(self.clock.now());
        let mode = request.mode;

        let Some(index) = envelope.position(&request.context_name) else {
            envelope.annotations.push(seed(request, timestamp));
            let index = envelope.annotations.len() - 1;
            debug!(context = %request.context_name, %mode, index, "created annotation");
            return MergeOutcome {
                index,
                created: true,
                mode,
            };
        };

        let record = &mut envelope.annotations[index];
        record.timestamp = timestamp;
        match mode {
            Mode::Delete => clear(record),
            Mode::Replace => {
                overwrite_metadata(record, request);
                record.summary = request.summary_text.clone();
            }
            Mode::Append => {
                overwrite_metadata(record, request);
                append_summary(&mut record.summary, &request.summary_text);
            }
        }
        record.mode = Some(mode);

        debug!(context = %request.context_name, %mode, index, "merged annotation");
        MergeOutcome {
            index,
            created: false,
            mode,
        }
    }
}

fn seed(request: &AnnotateRequest, timestamp: String) -> AnnotationRecord {
    AnnotationRecord {
        context_name: request.context_name.clone(),
        timestamp,
        style: request.style.clone(),
        summary: request.summary_text.clone(),
        summary_source_path: request.summary_source_path.clone(),
        priority: request.priority.unwrap_or(0),
        mode: Some(request.mode),
    }
}

// Name and source path survive a delete.
fn clear(record: &mut AnnotationRecord) {
    record.style.clear();
    record.summary.clear();
    record.priority = 0;
}

// Style, priority and path only ever move forward; blanks and the zero
// sentinel leave the stored value alone.
fn overwrite_metadata(record: &mut AnnotationRecord, request: &AnnotateRequest) {
    if !request.style.is_empty() {
        record.style = request.style.clone();
    }
    if let Some(priority) = request.priority.filter(|p| *p > 0) {
        record.priority = priority;
    }
    if !request.summary_source_path.is_empty() {
        record.summary_source_path = request.summary_source_path.clone();
    }
}

fn append_summary(stored: &mut String, addition: &str) {
    if addition.is_empty() {
        return;
    }
    if !stored.is_empty() {
        stored.push('\n');
    }
    stored.push_str(addition);
}
