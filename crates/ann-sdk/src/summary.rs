//! Bounded reading of summary files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Largest summary file accepted, in bytes (64 KiB).
pub const MAX_SUMMARY_BYTES: u64 = 64 * 1024;

/// Errors from reading a summary file.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The file is missing or unreadable.
    #[error("failed to read summary file '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is larger than the configured bound.
    #[error(
        "summary file '{}' exceeds {limit} bytes with size {size} bytes",
        .path.display()
    )]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Reads summary files into memory, refusing anything over `max_bytes`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryLoader {
    max_bytes: u64,
}

impl SummaryLoader {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Read the summary at `path`.
    ///
    /// No path (or an empty one) yields an empty summary. The size is checked
    /// before the body is read, and the read itself is capped so a file that
    /// grows in between is still rejected. Bytes that are not valid UTF-8
    /// are replaced with U+FFFD.
    pub fn load(&self, path: Option<&Path>) -> Result<String, SummaryError> {
        let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(String::new());
        };
        let read_err = |source| SummaryError::Read {
            path: path.to_path_buf(),
            source,
        };
        let too_large = |size| SummaryError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: self.max_bytes,
        };

        let size = path.metadata().map_err(read_err)?.len();
        if size > self.max_bytes {
            return Err(too_large(size));
        }

        let mut body = Vec::new();
        File::open(path)
            .map_err(read_err)?
            .take(self.max_bytes + 1)
            .read_to_end(&mut body)
            .map_err(read_err)?;
        if body.len() as u64 > self.max_bytes {
            return Err(too_large(body.len() as u64));
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl Default for SummaryLoader {
    fn default() -> Self {
        Self::new(MAX_SUMMARY_BYTES)
    }
}
