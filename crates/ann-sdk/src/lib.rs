//! High-level SDK for recording pipeline annotations.
//!
//! Ties the pieces together for one invocation: read the summary file,
//! build an [`AnnotateRequest`], run the load-merge-save cycle against the
//! configured store, and produce an [`AnnotateReceipt`] for the caller.
//! This is the main entry point for the `ann` binary and for embedders.

pub mod annotator;
pub mod config;
pub mod error;
pub mod summary;

pub use annotator::{AnnotateInput, AnnotateReceipt, Annotator};
pub use config::AnnotatorConfig;
pub use error::{SdkError, SdkResult};
pub use summary::{SummaryError, SummaryLoader, MAX_SUMMARY_BYTES};

// Re-export key types
pub use ann_merge::{Clock, MergeEngine, SystemClock};
pub use ann_store::{EnvelopeStore, FileEnvelopeStore, InMemoryEnvelopeStore, StoreError};
pub use ann_types::{AnnotateRequest, AnnotationRecord, HarnessContext, Mode, StoreEnvelope};
