//! Error types for the subtest runner
//!
//! These cover the host side only: loading suites, configuration and
//! reporting. A failing test is not an `Error`; it is an outcome recorded on
//! the test case itself.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the subtest runner
#[derive(Error, Debug)]
pub enum Error {
    // === Suite Errors ===
    #[error("Test '{name}' is already registered in suite '{suite}'")]
    DuplicateTest { suite: String, name: String },

    #[error("Invalid test name {name:?}: {reason}")]
    InvalidTestName { name: String, reason: String },

    #[error("Test '{test}' references unknown body '{body}'. Define it under 'bodies:' first")]
    UnknownBody { test: String, body: String },

    #[error("No test matches '{pattern}'. Use 'subtest list' to see available tests")]
    TestNotFound { pattern: String },

    #[error("Unknown fixture '{name}'. Available: {available}")]
    UnknownFixture { name: String, available: String },

    // === Run Errors ===
    #[error("{failed} of {total} test(s) failed")]
    TestsFailed { failed: usize, total: usize },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid suite file '{path}': {error}")]
    SuiteParse { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a duplicate test error
    pub fn duplicate_test(suite: &str, name: &str) -> Self {
        Self::DuplicateTest {
            suite: suite.to_string(),
            name: name.to_string(),
        }
    }

    /// Create an unknown fixture error listing the fixtures that do exist
    pub fn unknown_fixture<S: AsRef<str>>(name: &str, available: &[S]) -> Self {
        Self::UnknownFixture {
            name: name.to_string(),
            available: available
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fixture_lists_available() {
        let err = Error::unknown_fixture("nope", &["bal", "subtest_bar"]);
        assert_eq!(
            err.to_string(),
            "Unknown fixture 'nope'. Available: bal, subtest_bar"
        );
    }

    #[test]
    fn test_tests_failed_message() {
        let err = Error::TestsFailed { failed: 2, total: 3 };
        assert_eq!(err.to_string(), "2 of 3 test(s) failed");
    }
}
