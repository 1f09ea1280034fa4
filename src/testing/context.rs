//! The per-test execution handle
//!
//! Every body receives a `&mut T` for the test it implements. The handle owns
//! that test's failure flag, its diagnostic output, and the records of the
//! subtests it has run so far, and it carries the reporter, filter and
//! runner settings down to those subtests. Nothing is global: a subtest only
//! learns about its run through the handle it was given.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, warn};

use crate::common::config::RunnerConfig;

use super::case::{escape_segment, name_problem, TestCase};
use super::filter::RunFilter;
use super::report::Reporter;

/// Signal that the current body stopped early
///
/// Only `T::fail_now` and `T::fatal` create one, so a body that returns
/// `Err(Abort)` has always marked its test failed.
#[derive(Debug, PartialEq, Eq)]
pub struct Abort(());

/// What a test body returns: `Ok(())` to finish normally, `Err(Abort)` when
/// it was cut short with `fail_now`/`fatal` (usually through `?`)
pub type Flow = std::result::Result<(), Abort>;

/// Handle to the currently executing test
pub struct T<'a> {
    path: String,
    depth: usize,
    failed: bool,
    output: Vec<String>,
    children: Vec<TestCase>,
    /// Next `#NN` suffix for every child segment handed out so far
    seen: HashMap<String, usize>,
    reporter: &'a mut dyn Reporter,
    filter: &'a RunFilter,
    config: &'a RunnerConfig,
}

impl<'a> T<'a> {
    /// Full path of the running test, e.g. `TestWithSubTests/another_subtest`
    pub fn name(&self) -> &str {
        &self.path
    }

    /// Whether the running test has been marked failed so far
    ///
    /// Includes failures propagated from subtests that already finished.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Record a diagnostic line on the running test
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(test = %self.path, "{}", message);
        self.output.push(message);
    }

    /// Mark the test failed and keep executing the body
    pub fn fail(&mut self) {
        self.failed = true;
    }

    /// Mark the test failed and stop the body
    ///
    /// Return the result from the body (or use `?`) so that nothing after
    /// the call runs. Sibling and parent tests continue normally.
    pub fn fail_now(&mut self) -> Flow {
        self.failed = true;
        Err(Abort(()))
    }

    /// `log` followed by `fail`
    pub fn error(&mut self, message: impl Into<String>) {
        self.log(message);
        self.fail();
    }

    /// `log` followed by `fail_now`
    pub fn fatal(&mut self, message: impl Into<String>) -> Flow {
        self.log(message);
        self.fail_now()
    }

    /// Register a subtest named `name` and run it to completion
    ///
    /// Subtests run synchronously, one at a time, in the order they are
    /// registered. Returns whether the subtest passed; a failed subtest also
    /// marks this test failed. Subtests excluded by the run filter are not
    /// executed and count as passed.
    pub fn run<F>(&mut self, name: &str, body: F) -> bool
    where
        F: FnOnce(&mut T<'_>) -> Flow,
    {
        let depth = self.depth + 1;
        let segment = self.unique_segment(name);
        let path = format!("{}/{}", self.path, segment);

        let case = if let Some(problem) = name_problem(name) {
            reject(path, depth, problem, &mut *self.reporter)
        } else if !self.filter.matches(depth, name, &segment) {
            debug!(test = %path, "skipped by filter");
            return true;
        } else {
            execute(name, path, depth, &mut *self.reporter, self.filter, self.config, body)
        };

        let passed = case.passed();
        if !passed {
            self.failed = true;
        }
        self.children.push(case);
        passed
    }

    /// Pick a segment no earlier sibling has used
    ///
    /// Generated `name#NN` candidates are recorded too, so a sibling that is
    /// literally named `name#01` cannot collide with a generated one.
    fn unique_segment(&mut self, name: &str) -> String {
        let mut candidate = escape_segment(name);
        loop {
            match self.seen.get(&candidate).copied() {
                None => {
                    self.seen.insert(candidate.clone(), 1);
                    return candidate;
                }
                Some(next) => {
                    self.seen.insert(candidate.clone(), next + 1);
                    candidate = format!("{}#{:02}", candidate, next);
                }
            }
        }
    }
}

/// Run one test body and seal its record
///
/// Emits `start` before the body and `finish` after it (and after all of its
/// subtests) to the reporter.
pub(crate) fn execute<F>(
    name: &str,
    path: String,
    depth: usize,
    reporter: &mut dyn Reporter,
    filter: &RunFilter,
    config: &RunnerConfig,
    body: F,
) -> TestCase
where
    F: FnOnce(&mut T<'_>) -> Flow,
{
    reporter.start(&path);
    debug!(test = %path, depth, "running");
    let started = Instant::now();
    let pending = TestCase::pending(name, path.clone(), depth);

    let mut t = T {
        path,
        depth,
        failed: false,
        output: Vec::new(),
        children: Vec::new(),
        seen: HashMap::new(),
        reporter: &mut *reporter,
        filter,
        config,
    };

    if depth > config.max_depth {
        warn!(test = %t.path, max_depth = config.max_depth, "subtest nesting too deep");
        t.error(format!(
            "subtest nesting depth {} exceeds max_depth {}",
            depth, config.max_depth
        ));
    } else if config.catch_panics {
        let result = panic::catch_unwind(AssertUnwindSafe(|| body(&mut t)));
        if let Err(payload) = result {
            let message = panic_message(payload.as_ref());
            warn!(test = %t.path, "test panicked: {}", message);
            t.error(format!("panic: {}", message));
        }
    } else {
        // Err(Abort) has already marked the test failed
        let _ = body(&mut t);
    }

    let T {
        path,
        failed,
        output,
        children,
        ..
    } = t;
    let case = pending.complete(failed, output, children, started.elapsed());
    debug!(test = %path, outcome = case.outcome().as_str(), "finished");
    reporter.finish(&case);
    case
}

/// Record a subtest whose name cannot be registered
fn reject(path: String, depth: usize, problem: &str, reporter: &mut dyn Reporter) -> TestCase {
    warn!(test = %path, "invalid subtest name: {}", problem);
    reporter.start(&path);
    let case = TestCase::pending("", path, depth).complete(
        true,
        vec![format!("invalid subtest name: {}", problem)],
        Vec::new(),
        std::time::Duration::ZERO,
    );
    reporter.finish(&case);
    case
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
