//! # ckl CLI entry point
//!
//! Parses command-line arguments, resolves settings, and dispatches to the
//! checklist subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ckl_cli::checklist::{run_checklist, ChecklistCommand};
use ckl_cli::config::Settings;

/// Checklist engine CLI.
///
/// Creates, inspects, fills and submits checklists kept in a local state
/// directory.
#[derive(Parser, Debug)]
#[command(name = "ckl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: ChecklistCommand,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let result = Settings::resolve(cli.config.as_deref(), &cwd)
        .and_then(|settings| run_checklist(&cli.command, &settings));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
