//! CLI command handling
//!
//! Loads suites, runs them with the configured reporter and turns the
//! outcome into the process result.

use std::io;

use tracing::debug;

use crate::commands::{Commands, RunOptions};
use crate::common::config::{Config, ReportFormat};
use crate::common::{Error, Result};
use crate::testing::fixtures::{self, FIXTURES};
use crate::testing::{ConsoleReporter, JsonReporter, RunFilter, RunSummary, ScriptSuite, Suite};

/// Dispatch a CLI command
pub fn dispatch(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run { path, options } => {
            let script = ScriptSuite::load(&path)?;
            debug!(suite = %script.name, path = %path.display(), "loaded suite");
            let suite = script.into_suite()?;
            run_suite(&suite, &options, config)
        }

        Commands::List { path } => {
            let script = ScriptSuite::load(&path)?;
            println!("{}", script.name);
            if let Some(desc) = &script.description {
                println!("  {}", desc);
            }
            for entry in script.outline() {
                println!("{}{}", "  ".repeat(entry.depth + 1), entry.name);
            }
            Ok(())
        }

        Commands::Fixture { name, options } => {
            let suite = fixtures::fixture(&name)?;
            run_suite(&suite, &options, config)
        }

        Commands::Fixtures => {
            for name in FIXTURES {
                let suite = fixtures::fixture(name)?;
                println!("{}", suite.name());
                for test in suite.names() {
                    println!("  {}", test);
                }
            }
            Ok(())
        }
    }
}

/// Run a suite and report to stdout
///
/// Fails with `TestNotFound` when a pattern selects no top-level test and
/// with `TestsFailed` when any selected test fails.
pub fn run_suite(suite: &Suite, options: &RunOptions, config: &Config) -> Result<()> {
    let filter = RunFilter::parse(options.pattern.as_deref().unwrap_or(""));
    if !filter.is_empty() && suite.matching(&filter).is_empty() {
        return Err(Error::TestNotFound {
            pattern: options.pattern.clone().unwrap_or_default(),
        });
    }

    let json = options.json || config.output.format == ReportFormat::Json;
    let verbose = options.verbose || config.output.verbose;
    let stdout = io::stdout().lock();

    let summary = if json {
        let mut reporter = JsonReporter::new(stdout, suite.name());
        let summary = suite.run(&filter, &mut reporter, &config.runner);
        if let Some(e) = reporter.take_error() {
            return Err(Error::Io(e));
        }
        summary
    } else {
        let mut reporter = ConsoleReporter::new(stdout, verbose);
        let summary = suite.run(&filter, &mut reporter, &config.runner);
        if let Some(e) = reporter.take_error() {
            return Err(Error::Io(e));
        }
        summary
    };

    check_summary(&summary)
}

fn check_summary(summary: &RunSummary) -> Result<()> {
    if summary.passed() {
        Ok(())
    } else {
        Err(Error::TestsFailed {
            failed: summary.failed_count(),
            total: summary.total_count(),
        })
    }
}
