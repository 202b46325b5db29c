//! Foundation types for pipeline annotations.
//!
//! Every pipeline step that wants to surface a note to the reporting system
//! writes one [`AnnotationRecord`] per context key into a shared
//! [`StoreEnvelope`]. This crate holds the data model only; loading, merging
//! and persisting live in `ann-store` and `ann-merge`.
//!
//! # Key Types
//!
//! - [`AnnotationRecord`] — One entry per unique context key
//! - [`StoreEnvelope`] — The whole on-disk document
//! - [`Mode`] — Reconciliation policy (`replace`, `append`, `delete`)
//! - [`AnnotateRequest`] — A single update to apply to the envelope
//! - [`HarnessContext`] — Pipeline identity read from the environment

pub mod context;
pub mod error;
pub mod mode;
pub mod record;
pub mod request;

pub use context::HarnessContext;
pub use error::TypeError;
pub use mode::Mode;
pub use record::{AnnotationRecord, StoreEnvelope};
pub use request::AnnotateRequest;
