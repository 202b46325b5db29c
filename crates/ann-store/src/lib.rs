//! Envelope storage for pipeline annotations.
//!
//! The whole annotation document ([`StoreEnvelope`]) is loaded and saved
//! wholesale on every invocation. Callers depend on the [`EnvelopeStore`]
//! trait so the merge cycle can run against a file or against memory.
//!
//! # Storage Backends
//!
//! - [`FileEnvelopeStore`] -- pretty-printed JSON file, written atomically
//! - [`InMemoryEnvelopeStore`] -- `RwLock`-backed store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A missing or zero-byte file is an empty envelope, not an error.
//! 2. A file that does not parse is never overwritten; loading fails instead.
//! 3. Saves go to a sibling temporary file first and are renamed into place,
//!    so readers see either the old or the new document, never a torn one.
//! 4. No locking: invocations are serialized by the surrounding pipeline.
//!
//! [`StoreEnvelope`]: ann_types::StoreEnvelope

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::FileEnvelopeStore;
pub use memory::InMemoryEnvelopeStore;
pub use traits::EnvelopeStore;
