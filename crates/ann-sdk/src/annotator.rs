use std::path::Path;

use ann_merge::{merge_and_persist, Clock, MergeEngine, SystemClock};
use ann_store::{EnvelopeStore, FileEnvelopeStore};
use ann_types::{AnnotateRequest, HarnessContext, Mode};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::config::AnnotatorConfig;
use crate::error::{SdkError, SdkResult};
use crate::summary::SummaryLoader;

/// Raw arguments of one annotate call, as given on the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotateInput {
    pub context: String,
    pub style: String,
    /// Path of the markdown summary file, if any.
    pub summary: Option<String>,
    /// Unnormalized mode; unknown values mean `replace`.
    pub mode: String,
    /// `0` means "no priority given".
    pub priority: i64,
}

impl AnnotateInput {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Default::default()
        }
    }
}

/// What the caller prints after a successful annotate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateReceipt {
    pub context: String,
    pub stepid: String,
    pub message: String,
}

impl AnnotateReceipt {
    fn new(context: &str, step_id: &str) -> Self {
        Self {
            context: context.to_string(),
            stepid: step_id.to_string(),
            message: format!(
                "Annotation stored for context '{context}' with step ID '{step_id}'"
            ),
        }
    }
}

/// Runs the annotate cycle for one invocation.
pub struct Annotator<S = FileEnvelopeStore, C = SystemClock> {
    store: S,
    engine: MergeEngine<C>,
    context: HarnessContext,
    summaries: SummaryLoader,
}

impl Annotator<FileEnvelopeStore, SystemClock> {
    /// File-backed annotator for `config`.
    pub fn from_config(config: &AnnotatorConfig, context: HarnessContext) -> Self {
        Self::new(
            FileEnvelopeStore::new(&config.annotations_file),
            MergeEngine::new(),
            context,
        )
        .with_summary_loader(SummaryLoader::new(config.max_summary_bytes))
    }
}

impl<S: EnvelopeStore, C: Clock> Annotator<S, C> {
    pub fn new(store: S, engine: MergeEngine<C>, context: HarnessContext) -> Self {
        Self {
            store,
            engine,
            context,
            summaries: SummaryLoader::default(),
        }
    }

    pub fn with_summary_loader(mut self, loader: SummaryLoader) -> Self {
        self.summaries = loader;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn context(&self) -> &HarnessContext {
        &self.context
    }

    /// Record one annotation.
    ///
    /// The summary file is read (and size-checked) before the store is
    /// touched, so a rejected summary never changes the envelope.
    pub fn annotate(&self, input: &AnnotateInput) -> SdkResult<AnnotateReceipt> {
        let span = info_span!(
            "annotate",
            context = %input.context,
            step = self.context.step_id_or_empty(),
            pipeline = self.context.pipeline_id.as_deref().unwrap_or(""),
            stage = self.context.stage_id.as_deref().unwrap_or(""),
        );
        let _guard = span.enter();

        if input.context.is_empty() {
            return Err(SdkError::MissingArgument { name: "context" });
        }

        let summary_path = input.summary.as_deref().unwrap_or("");
        let summary_text = self.summaries.load(Some(Path::new(summary_path)))?;

        let mode = Mode::normalize(&input.mode);
        if !input.mode.is_empty() && mode.as_str() != input.mode {
            warn!(requested = %input.mode, "unknown annotation mode; using replace");
        }

        let request = AnnotateRequest::new(input.context.clone())
            .style(input.style.clone())
            .summary(summary_text, summary_path)
            .with_sentinel_priority(input.priority)
            .mode(mode);

        let report = merge_and_persist(
            &self.store,
            &self.engine,
            &request,
            self.context.execution_id.as_deref(),
        )?;
        info!(
            %mode,
            created = report.outcome.created,
            priority = report.record.priority,
            "annotation stored"
        );

        Ok(AnnotateReceipt::new(
            &input.context,
            self.context.step_id_or_empty(),
        ))
    }
}
