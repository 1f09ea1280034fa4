//! CLI command definitions
//!
//! Defines the clap commands for the subtest CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the tests of a YAML suite file
    Run {
        /// Path to the YAML suite file
        path: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// List the tests of a YAML suite file
    #[command(alias = "ls")]
    List {
        /// Path to the YAML suite file
        path: PathBuf,
    },

    /// Run one of the built-in fixture suites
    Fixture {
        /// Fixture name (see 'subtest fixtures')
        name: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// List the built-in fixture suites and their tests
    Fixtures,
}

/// Options shared by every command that runs tests
#[derive(Args, Debug, Default, Clone)]
pub struct RunOptions {
    /// Only run tests whose name path matches exactly, e.g. 'TestA/sub name'
    #[arg(long = "run", value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Write one JSON object per event instead of text
    #[arg(long)]
    pub json: bool,

    /// Print every test, not only failures
    #[arg(long, short)]
    pub verbose: bool,
}
