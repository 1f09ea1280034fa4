//! Logging and tracing configuration
//!
//! stdout belongs to the test report, so diagnostics from the runner itself
//! go to stderr and, when requested, to a log file in the data directory.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Name of the log file written by `init_with_file`
const LOG_FILE: &str = "subtest.log";

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("subtest=warn,warn"))
}

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is WARN so a normal run prints only the report.
pub fn init_cli() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing with an additional log file
///
/// The file lives at `<data dir>/logs/subtest.log` and receives full detail.
/// Returns the file path and the guard that flushes the writer on drop;
/// falls back to `init_cli` when the log directory cannot be created.
pub fn init_with_file() -> Option<(PathBuf, WorkerGuard)> {
    let log_dir = match paths::ensure_log_dir() {
        Ok(Some(dir)) => dir,
        Ok(None) => {
            init_cli();
            return None;
        }
        Err(e) => {
            eprintln!("Warning: Could not create log directory: {}", e);
            init_cli();
            return None;
        }
    };

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(default_filter())
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Some((log_dir.join(LOG_FILE), guard))
}
