//! Merge engine for pipeline annotations.
//!
//! Applies one [`AnnotateRequest`] to a [`StoreEnvelope`]: find or create the
//! record for the request's context, reconcile it according to the request's
//! [`Mode`], and persist the envelope through an [`EnvelopeStore`].
//!
//! # Policies
//!
//! | mode      | style            | summary                    | priority     |
//! |-----------|------------------|----------------------------|--------------|
//! | `replace` | set if non-empty | overwritten                | set if `> 0` |
//! | `append`  | set if non-empty | joined with `\n`           | set if `> 0` |
//! | `delete`  | cleared          | cleared                    | cleared      |
//!
//! New contexts are always created from the request, whatever the mode.
//!
//! [`AnnotateRequest`]: ann_types::AnnotateRequest
//! [`StoreEnvelope`]: ann_types::StoreEnvelope
//! [`Mode`]: ann_types::Mode
//! [`EnvelopeStore`]: ann_store::EnvelopeStore

pub mod clock;
pub mod engine;
pub mod persist;

pub use clock::{format_timestamp, Clock, SystemClock};
pub use engine::{MergeEngine, MergeOutcome};
pub use persist::{merge_and_persist, MergeReport};
