use std::ffi::OsString;
use std::io::Write;

use ann_sdk::{AnnotateReceipt, Annotator, AnnotatorConfig, HarnessContext};
use clap::error::ErrorKind;
use clap::CommandFactory;
use colored::Colorize;
use tracing::debug;

use crate::cli::*;

/// Prefix of every diagnostic line written to stderr.
pub const DIAG_PREFIX: &str = "[ANN_CLI]";

pub fn run_command(
    cli: Cli,
    mut config: AnnotatorConfig,
    harness: HarnessContext,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    if let Some(file) = cli.file {
        config.annotations_file = file;
    }
    config.strict |= cli.strict;
    debug!(
        file = %config.annotations_file.display(),
        strict = config.strict,
        "resolved configuration"
    );

    match cli.command {
        Command::Annotate(args) => cmd_annotate(&args, &config, harness, &cli.format, out),
    }
}

fn cmd_annotate(
    args: &AnnotateArgs,
    config: &AnnotatorConfig,
    harness: HarnessContext,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let annotator = Annotator::from_config(config, harness);
    let receipt = annotator.annotate(&args.to_input())?;
    print_receipt(&receipt, format, out)
}

fn print_receipt(
    receipt: &AnnotateReceipt,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(receipt)?)?,
        OutputFormat::Text => writeln!(out, "{} {}", "✓".green().bold(), receipt.message)?,
    }
    Ok(())
}

/// Exit status for a failure: `code` when strict, otherwise success.
pub fn failure_code(strict: bool, code: u8) -> u8 {
    if strict {
        code
    } else {
        0
    }
}

/// Whether failures should exit non-zero, decided before parsing so that
/// parse errors honour `--strict` too.
pub fn strict_requested(config: &AnnotatorConfig, args: &[OsString]) -> bool {
    config.strict || args.iter().any(|a| a.as_os_str() == "--strict")
}

/// Report a failed run as a single warning line and return the exit status.
pub fn report_failure(err: &anyhow::Error, strict: bool, diag: &mut dyn Write) -> u8 {
    let _ = writeln!(diag, "{DIAG_PREFIX} warning: {err:#}");
    failure_code(strict, 1)
}

/// Report a command-line parse failure the way the pipeline expects.
///
/// Help and version go to `out` and succeed. A missing or unknown
/// subcommand prints usage. Anything else is a one-line warning.
pub fn report_parse_error(
    err: &clap::Error,
    strict: bool,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(out, "{err}");
            0
        }
        ErrorKind::MissingSubcommand
        | ErrorKind::InvalidSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = writeln!(out, "{}", Cli::command().render_usage());
            let _ = writeln!(out, "Available commands: annotate");
            failure_code(strict, 2)
        }
        _ => {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            let reason = first.strip_prefix("error: ").unwrap_or(first);
            let _ = writeln!(diag, "{DIAG_PREFIX} warning: failed to parse flags: {reason}");
            failure_code(strict, 2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn run(argv: &[&str], config: AnnotatorConfig, step: &str) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(argv).unwrap();
        let harness = HarnessContext {
            execution_id: Some("E1".into()),
            step_id: Some(step.into()),
            ..Default::default()
        };
        let mut out = Vec::new();
        run_command(cli, config, harness, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn annotate_prints_json_receipt_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.md");
        fs::write(&summary, "Hello").unwrap();
        let file = dir.path().join("annotations.json");
        let summary_arg = summary.display().to_string();
        let file_arg = file.display().to_string();

        let printed = run(
            &[
                "ann", "annotate", "--context", "build", "--style", "info", "--summary",
                summary_arg.as_str(), "--priority", "5", "--file", file_arg.as_str(),
            ],
            AnnotatorConfig::default(),
            "step-1",
        )
        .unwrap();

        let receipt: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(receipt["context"], "build");
        assert_eq!(receipt["stepid"], "step-1");

        let stored: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(stored["planExecutionId"], "E1");
        assert_eq!(stored["annotations"][0]["summary"], "Hello");
        assert_eq!(stored["annotations"][0]["priority"], 5);
        assert_eq!(stored["annotations"][0]["mode"], "replace");
    }

    #[test]
    fn text_format_prints_message() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnnotatorConfig {
            annotations_file: dir.path().join("a.json"),
            ..Default::default()
        };
        let printed = run(
            &["ann", "--format", "text", "annotate", "--context", "lint"],
            config,
            "s",
        )
        .unwrap();
        assert!(printed.contains("Annotation stored for context 'lint' with step ID 's'"));
    }

    #[test]
    fn missing_context_is_an_error_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnnotatorConfig {
            annotations_file: dir.path().join("a.json"),
            ..Default::default()
        };
        let err = run(&["ann", "annotate"], config.clone(), "s").unwrap_err();
        assert_eq!(err.to_string(), "--context is required");
        assert!(!config.annotations_file.exists());
    }

    #[test]
    fn failure_code_depends_on_policy() {
        assert_eq!(failure_code(false, 1), 0);
        assert_eq!(failure_code(true, 1), 1);
        assert_eq!(failure_code(true, 2), 2);
    }

    struct Exit {
        code: u8,
        out: String,
        diag: String,
    }

    // Drives parsing, dispatch and reporting the same way `main` does.
    fn exit_with(argv: &[&str], config: AnnotatorConfig) -> Exit {
        let args: Vec<OsString> = argv.iter().map(OsString::from).collect();
        let strict = strict_requested(&config, &args);
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let code = match Cli::try_parse_from(&args) {
            Err(err) => report_parse_error(&err, strict, &mut out, &mut diag),
            Ok(cli) => match run_command(cli, config, HarnessContext::default(), &mut out) {
                Ok(()) => 0,
                Err(err) => report_failure(&err, strict, &mut diag),
            },
        };
        Exit {
            code,
            out: String::from_utf8(out).unwrap(),
            diag: String::from_utf8(diag).unwrap(),
        }
    }

    fn config_in(dir: &tempfile::TempDir) -> AnnotatorConfig {
        AnnotatorConfig {
            annotations_file: dir.path().join("a.json"),
            ..Default::default()
        }
    }

    #[test]
    fn missing_context_exits_zero_unless_strict() {
        let dir = tempfile::tempdir().unwrap();

        let soft = exit_with(&["ann", "annotate"], config_in(&dir));
        assert_eq!(soft.code, 0);
        assert_eq!(soft.diag, "[ANN_CLI] warning: --context is required\n");
        assert!(soft.out.is_empty());

        let strict = exit_with(&["ann", "--strict", "annotate"], config_in(&dir));
        assert_eq!(strict.code, 1);
        assert_eq!(strict.diag, "[ANN_CLI] warning: --context is required\n");

        let from_env = exit_with(
            &["ann", "annotate"],
            AnnotatorConfig {
                strict: true,
                ..config_in(&dir)
            },
        );
        assert_eq!(from_env.code, 1);
        assert!(!dir.path().join("a.json").exists());
    }

    #[test]
    fn unknown_subcommand_prints_usage() {
        let dir = tempfile::tempdir().unwrap();

        let soft = exit_with(&["ann", "publish"], config_in(&dir));
        assert_eq!(soft.code, 0);
        assert!(soft.out.contains("Usage: ann"));
        assert!(soft.out.ends_with("Available commands: annotate\n"));
        assert!(soft.diag.is_empty());

        let strict = exit_with(&["ann", "--strict", "publish"], config_in(&dir));
        assert_eq!(strict.code, 2);
        assert!(strict.out.contains("Available commands: annotate"));
    }

    #[test]
    fn missing_subcommand_prints_usage() {
        let dir = tempfile::tempdir().unwrap();
        let soft = exit_with(&["ann"], config_in(&dir));
        assert_eq!(soft.code, 0);
        assert!(soft.out.contains("Available commands: annotate"));

        let strict = exit_with(&["ann", "--strict"], config_in(&dir));
        assert_eq!(strict.code, 2);
    }

    #[test]
    fn bad_priority_is_a_flag_warning() {
        let dir = tempfile::tempdir().unwrap();
        let argv = ["ann", "annotate", "--context", "c", "--priority", "high"];

        let soft = exit_with(&argv, config_in(&dir));
        assert_eq!(soft.code, 0);
        assert!(soft.diag.starts_with("[ANN_CLI] warning: failed to parse flags: "));
        assert!(soft.diag.contains("high"));
        assert_eq!(soft.diag.lines().count(), 1);
        assert!(!dir.path().join("a.json").exists());

        let strict = exit_with(
            &["ann", "--strict", "annotate", "--context", "c", "--priority", "high"],
            config_in(&dir),
        );
        assert_eq!(strict.code, 2);
    }

    #[test]
    fn help_exits_zero_even_when_strict() {
        let dir = tempfile::tempdir().unwrap();
        let help = exit_with(&["ann", "--help"], config_in(&dir));
        assert_eq!(help.code, 0);
        assert!(help.out.contains("annotate"));
        assert!(help.diag.is_empty());

        let strict = exit_with(&["ann", "--strict", "annotate", "--help"], config_in(&dir));
        assert_eq!(strict.code, 0);
        assert!(strict.out.contains("--context"));
    }

    #[test]
    fn store_failure_cause_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        fs::write(&config.annotations_file, "{not json").unwrap();

        let exit = exit_with(&["ann", "--strict", "annotate", "--context", "c"], config.clone());
        assert_eq!(exit.code, 1);
        assert_eq!(
            exit.diag,
            format!(
                "[ANN_CLI] warning: invalid annotations file format in {}: \
                 key must be a string at line 1 column 2\n",
                config.annotations_file.display()
            )
        );
        assert_eq!(fs::read_to_string(&config.annotations_file).unwrap(), "{not json");
    }
}
