use std::path::PathBuf;

/// Errors from envelope store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The existing file is not a valid annotations envelope.
    #[error("invalid annotations file format in {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The existing file could not be read.
    #[error("failed to read annotations file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parent directory of the target could not be created.
    #[error("failed to create parent dir {}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary file could not be created or written.
    #[error("failed to write temp file in {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary file could not be renamed onto the target.
    #[error("failed to finalize write of {}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The envelope could not be serialized.
    #[error("failed to serialize annotations")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
