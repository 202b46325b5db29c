use std::path::PathBuf;

use ann_store::file::DEFAULT_ANNOTATIONS_FILE;

use crate::summary::MAX_SUMMARY_BYTES;

/// Overrides the annotations file location.
pub const ENV_ANNOTATIONS_FILE: &str = "HARNESS_ANNOTATIONS_FILE";
/// Turns failures into a non-zero exit status when truthy.
pub const ENV_STRICT: &str = "HARNESS_ANNOTATIONS_STRICT";

/// Configuration for a single annotate invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatorConfig {
    /// Where the envelope lives.
    pub annotations_file: PathBuf,
    /// Upper bound for summary files.
    pub max_summary_bytes: u64,
    /// When `false`, failures are reported but never fail the pipeline step.
    pub strict: bool,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            annotations_file: PathBuf::from(DEFAULT_ANNOTATIONS_FILE),
            max_summary_bytes: MAX_SUMMARY_BYTES,
            strict: false,
        }
    }
}

impl AnnotatorConfig {
    /// Configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_ANNOTATIONS_FILE).filter(|v| !v.is_empty()) {
            config.annotations_file = PathBuf::from(path);
        }
        if let Some(flag) = lookup(ENV_STRICT) {
            config.strict = is_truthy(&flag);
        }
        config
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
