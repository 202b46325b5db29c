use crate::mode::Mode;

/// A single annotate call, already resolved to text.
///
/// `summary_text` is the content of the summary file (the loader has run by
/// the time a request exists); `summary_source_path` is only echoed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotateRequest {
    pub context_name: String,
    pub style: String,
    pub summary_text: String,
    pub summary_source_path: String,
    /// `None` means no priority change was requested.
    pub priority: Option<i64>,
    pub mode: Mode,
}

impl AnnotateRequest {
    /// A `replace` request for `context_name` with every other field empty.
    pub fn new(context_name: impl Into<String>) -> Self {
        Self {
            context_name: context_name.into(),
            ..Default::default()
        }
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the summary body and the path it was read from.
    pub fn summary(mut self, text: impl Into<String>, source_path: impl Into<String>) -> Self {
        self.summary_text = text.into();
        self.summary_source_path = source_path.into();
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set priority from a command-line value where `0` means "not given".
    pub fn with_sentinel_priority(mut self, priority: i64) -> Self {
        self.priority = (priority != 0).then_some(priority);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}
