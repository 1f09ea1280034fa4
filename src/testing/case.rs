//! Finished test case records
//!
//! A `TestCase` is produced once, when its body (and every subtest the body
//! registered) has finished. After that it is read-only.

use serde::Serialize;
use std::time::Duration;

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Registered but not executed yet
    #[default]
    NotYetRun,
    /// Body finished without a failure signal and every subtest passed
    Passed,
    /// Body signalled failure, or some subtest failed
    Failed,
}

impl Outcome {
    /// Label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotYetRun => "NOT RUN",
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
        }
    }
}

/// Rewrite a test name into a path segment
///
/// Whitespace becomes `_` so that a full path like
/// `TestWithSubTests/subtest_with_identifier` can be typed on a command line.
pub fn escape_segment(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Why `name` cannot be registered as a test name, if it cannot
///
/// `/` separates path segments, so a name containing it could never be
/// selected with a run filter.
pub fn name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("names must be non-empty")
    } else if name.contains('/') {
        Some("names must not contain '/'")
    } else {
        None
    }
}

/// A test case and the subtests it registered
#[derive(Debug, Clone)]
pub struct TestCase {
    name: String,
    path: String,
    depth: usize,
    outcome: Outcome,
    output: Vec<String>,
    children: Vec<TestCase>,
    elapsed: Duration,
}

impl TestCase {
    /// A registered case that has not run yet
    pub(crate) fn pending(name: &str, path: String, depth: usize) -> Self {
        Self {
            name: name.to_string(),
            path,
            depth,
            outcome: Outcome::NotYetRun,
            output: Vec::new(),
            children: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Seal the case with the results of its single execution
    ///
    /// The outcome is `Failed` when the body signalled failure or any child
    /// failed; otherwise `Passed`.
    pub(crate) fn complete(
        mut self,
        own_failure: bool,
        output: Vec<String>,
        children: Vec<TestCase>,
        elapsed: Duration,
    ) -> Self {
        debug_assert_eq!(self.outcome, Outcome::NotYetRun);
        let child_failed = children.iter().any(|c| c.outcome == Outcome::Failed);
        self.outcome = if own_failure || child_failed {
            Outcome::Failed
        } else {
            Outcome::Passed
        };
        self.output = output;
        self.children = children;
        self.elapsed = elapsed;
        self
    }

    /// Name as registered
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full slash-separated path, e.g. `TestWithSubTests/another_subtest`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Nesting depth; top-level tests are 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    /// Diagnostic lines logged by this case's own body, in order
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Subtests in registration order
    pub fn children(&self) -> &[TestCase] {
        &self.children
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Find a descendant (or this case) by full path
    pub fn find(&self, path: &str) -> Option<&TestCase> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}
