use std::ffi::OsString;
use std::process::ExitCode;

use ann_sdk::{AnnotatorConfig, HarnessContext};
use clap::Parser;
use tracing::Level;

mod cli;
mod commands;

fn main() -> ExitCode {
    let args: Vec<OsString> = std::env::args_os().collect();
    let config = AnnotatorConfig::from_env();
    let strict = commands::strict_requested(&config, &args);
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();

    let cli = match cli::Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            let code =
                commands::report_parse_error(&err, strict, &mut stdout.lock(), &mut stderr.lock());
            return code.into();
        }
    };
    init_tracing(cli.verbose);

    match commands::run_command(cli, config, HarnessContext::from_env(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => commands::report_failure(&err, strict, &mut stderr.lock()).into(),
    }
}

// Stdout carries the receipt, so logs go to stderr.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
