use serde::{Deserialize, Deserializer, Serialize};

use crate::mode::Mode;

/// One annotation, keyed by its context name.
///
/// Field names on the wire are a compatibility contract with the reporting
/// system that reads the file; `summary_source_path` is stored as
/// `summary_file`. Missing fields load as their zero values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationRecord {
    /// Grouping/identity key, unique within an envelope.
    pub context_name: String,
    /// RFC 3339 time of the last write touching this record.
    pub timestamp: String,
    /// Free-form style tag; empty means unset.
    pub style: String,
    /// Accumulated markdown body.
    pub summary: String,
    /// Last summary path supplied, echoed for traceability.
    #[serde(rename = "summary_file")]
    pub summary_source_path: String,
    /// `0` means no explicit priority was ever given.
    pub priority: i64,
    /// Last applied reconciliation policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

impl AnnotationRecord {
    /// An empty record for `context_name`.
    pub fn new(context_name: impl Into<String>) -> Self {
        Self {
            context_name: context_name.into(),
            ..Default::default()
        }
    }
}

/// The whole on-disk document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEnvelope {
    /// Identity of the pipeline run. First write wins.
    #[serde(
        rename = "planExecutionId",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub plan_execution_id: String,
    /// Records in insertion order, unique by `context_name`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub annotations: Vec<AnnotationRecord>,
}

impl StoreEnvelope {
    /// A fresh envelope with no identity and no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the record for `context_name`, if any.
    pub fn position(&self, context_name: &str) -> Option<usize> {
        self.annotations
            .iter()
            .position(|r| r.context_name == context_name)
    }

    /// The record for `context_name`, if any.
    pub fn find(&self, context_name: &str) -> Option<&AnnotationRecord> {
        self.position(context_name).map(|i| &self.annotations[i])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Returns `true` if the envelope holds no records.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Returns `true` once a non-blank execution id has been recorded.
    pub fn has_execution_id(&self) -> bool {
        !self.plan_execution_id.trim().is_empty()
    }
}

// Older writers emitted `"annotations": null` for an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<AnnotationRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<AnnotationRecord>>::deserialize(deserializer)?.unwrap_or_default())
}
