mod alias;
mod commands;
mod config;
mod diagnostics;
mod error;
mod logging;
mod navigator;
mod picker;
mod resolver;
mod rewrite;
mod scanner;
mod strategy;
mod theme;
mod tui;
mod types;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::logging::Sink;

/// Exit status for errors that stopped lynks before it could finish.
const EXIT_ERROR: u8 = 2;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "lynks", about = "Find and repair broken links between markdown documents")]
struct Cli {
    /// Subcommand; the interactive navigator when absent.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Config file to use instead of lynks.toml / lynks.config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append logs to this file (LYNKS_LOG sets the level)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

/// Non-interactive subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Report unresolved links and exit 1 if any are found
    Lint,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    return match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(EXIT_ERROR)
        },
    };
}

/// Set up logging, load config, and dispatch to the chosen command.
///
/// # Errors
///
/// Returns any error from logging setup, config loading, or the command.
fn run(cli: &Cli) -> Result<ExitCode, error::Error> {
    let sink = match (&cli.log_file, &cli.command) {
        (Some(path), _) => Sink::File(path),
        (None, Some(Commands::Lint)) => Sink::Stderr,
        (None, None) => Sink::Off,
    };
    logging::init(sink)?;

    let config = Config::load(Path::new("."), cli.config.as_deref())?;
    return match cli.command {
        Some(Commands::Lint) => commands::lint(&config),
        None => commands::interactive(config),
    };
}
