use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown annotation mode: {0:?} (expected append, replace or delete)")]
    UnknownMode(String),
}
