//! Subtest CLI - run and list suites of nested named subtests
//!
//! Test reports go to stdout; runner diagnostics go to stderr (and the log
//! file with `--log-file`). The exit status is 1 when any test fails.

use std::path::PathBuf;

use clap::Parser;
use subtest::common::config::Config;
use subtest::common::logging;
use subtest::{cli, commands};
use commands::Commands;

#[derive(Parser)]
#[command(name = "subtest", about = "Run nested named subtests and report their outcomes")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Also write logs to the data directory
    #[arg(long, global = true)]
    log_file: bool,
}

fn main() {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let log_guard = if cli.log_file {
        logging::init_with_file().map(|(_, guard)| guard)
    } else {
        logging::init_cli();
        None
    };

    let result = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .and_then(|config| {
        if cli.no_color || !config.output.color {
            colored::control::set_override(false);
        }
        cli::dispatch(cli.command, &config)
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        drop(log_guard);
        std::process::exit(1);
    }
}
