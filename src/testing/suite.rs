//! Top-level test registry
//!
//! A `Suite` is the unit a host discovers and runs: an ordered list of
//! uniquely named top-level tests. Bodies are `Fn`, so the same suite can be
//! run any number of times.

use std::time::{Duration, Instant};

use tracing::info;

use crate::common::config::RunnerConfig;
use crate::common::{Error, Result};

use super::case::{escape_segment, name_problem, TestCase};
use super::context::{execute, Flow, T};
use super::filter::RunFilter;
use super::report::Reporter;

/// A reusable top-level test body
pub type TestBody = Box<dyn Fn(&mut T<'_>) -> Flow>;

struct TopLevel {
    name: String,
    body: TestBody,
}

/// An ordered set of top-level tests
pub struct Suite {
    name: String,
    tests: Vec<TopLevel>,
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field(
                "tests",
                &self.tests.iter().map(|t| &t.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a top-level test
    ///
    /// Names must be non-empty, free of `/`, and unique within the suite.
    pub fn add<F>(&mut self, name: &str, body: F) -> Result<()>
    where
        F: Fn(&mut T<'_>) -> Flow + 'static,
    {
        if let Some(reason) = name_problem(name) {
            return Err(Error::InvalidTestName {
                name: name.to_string(),
                reason: reason.to_string(),
            });
        }
        if self.tests.iter().any(|t| t.name == name) {
            return Err(Error::duplicate_test(&self.name, name));
        }
        self.tests.push(TopLevel {
            name: name.to_string(),
            body: Box::new(body),
        });
        Ok(())
    }

    /// Top-level test names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tests.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Top-level tests selected by `filter`
    pub fn matching(&self, filter: &RunFilter) -> Vec<&str> {
        self.tests
            .iter()
            .filter(|t| filter.matches(0, &t.name, &escape_segment(&t.name)))
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Run every selected top-level test in registration order
    pub fn run(
        &self,
        filter: &RunFilter,
        reporter: &mut dyn Reporter,
        config: &RunnerConfig,
    ) -> RunSummary {
        let started = Instant::now();
        let mut cases = Vec::new();

        for test in &self.tests {
            let segment = escape_segment(&test.name);
            if !filter.matches(0, &test.name, &segment) {
                continue;
            }
            let case = execute(
                &test.name,
                segment,
                0,
                &mut *reporter,
                filter,
                config,
                test.body.as_ref(),
            );
            cases.push(case);
        }

        let summary = RunSummary {
            suite: self.name.clone(),
            cases,
            elapsed: started.elapsed(),
        };
        info!(
            suite = %summary.suite,
            total = summary.total_count(),
            failed = summary.failed_count(),
            "suite finished"
        );
        reporter.summary(&summary);
        summary
    }
}

/// Results of one suite run
#[derive(Debug, Clone)]
pub struct RunSummary {
    suite: String,
    cases: Vec<TestCase>,
    elapsed: Duration,
}

impl RunSummary {
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Top-level test records in execution order
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// True when every executed top-level test (and so every descendant) passed
    pub fn passed(&self) -> bool {
        self.cases.iter().all(TestCase::passed)
    }

    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed()).count()
    }

    pub fn total_count(&self) -> usize {
        self.cases.len()
    }

    /// Find any executed test by full path
    pub fn find(&self, path: &str) -> Option<&TestCase> {
        self.cases.iter().find_map(|c| c.find(path))
    }
}
