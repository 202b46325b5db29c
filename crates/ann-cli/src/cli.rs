use std::path::PathBuf;

use ann_sdk::AnnotateInput;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ann",
    about = "Record pipeline step annotations for the reporting system",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Annotations file (overrides HARNESS_ANNOTATIONS_FILE)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Exit non-zero on failure instead of only warning
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or update the annotation for a context
    Annotate(AnnotateArgs),
}

#[derive(Args)]
pub struct AnnotateArgs {
    /// Context of the step (used as ID) - required
    #[arg(long)]
    pub context: Option<String>,
    /// Annotation style (info|success|warning|error)
    #[arg(long, default_value = "")]
    pub style: String,
    /// Path to summary file (markdown content)
    #[arg(long)]
    pub summary: Option<String>,
    /// Annotation mode (append|replace|delete)
    #[arg(long, default_value = "replace")]
    pub mode: String,
    /// Annotation priority; 0 leaves the stored priority unchanged
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub priority: i64,
}

impl AnnotateArgs {
    pub fn to_input(&self) -> AnnotateInput {
        AnnotateInput {
            context: self.context.clone().unwrap_or_default(),
            style: self.style.clone(),
            summary: self.summary.clone(),
            mode: self.mode.clone(),
            priority: self.priority,
        }
    }
}
