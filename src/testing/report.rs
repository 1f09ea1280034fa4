//! Report collectors
//!
//! The runner hands every test to a `Reporter` twice: once when it starts
//! and once when it has finished (after all of its subtests). Finish events
//! therefore arrive children-first, siblings in registration order.

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;
use serde::Serialize;

use super::case::{Outcome, TestCase};
use super::suite::RunSummary;

/// Output collector for a test run
pub trait Reporter {
    /// A test is about to execute its body
    fn start(&mut self, _path: &str) {}

    /// A test and all of its subtests have finished
    fn finish(&mut self, case: &TestCase);

    /// Every selected top-level test of the suite has finished
    fn summary(&mut self, _summary: &RunSummary) {}
}

/// Event captured by `MemoryReporter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start {
        path: String,
    },
    Finish {
        path: String,
        outcome: Outcome,
        output: Vec<String>,
    },
}

/// Reporter that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Vec<Event>,
}

impl MemoryReporter {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Paths of finished tests in the order they were reported
    pub fn finished_paths(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Finish { path, .. } => Some(path.as_str()),
                Event::Start { .. } => None,
            })
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn start(&mut self, path: &str) {
        self.events.push(Event::Start {
            path: path.to_string(),
        });
    }

    fn finish(&mut self, case: &TestCase) {
        self.events.push(Event::Finish {
            path: case.path().to_string(),
            outcome: case.outcome(),
            output: case.output().to_vec(),
        });
    }
}

fn seconds(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}

/// Human-readable reporter in the style of `go test`
///
/// Failures are always printed with their output. With `verbose`, every
/// test also gets a `=== RUN` line and passing tests are printed too.
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            error: None,
        }
    }

    /// First write error encountered, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", line) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn start(&mut self, path: &str) {
        if self.verbose {
            self.write_line(&format!("=== RUN   {}", path));
        }
    }

    fn finish(&mut self, case: &TestCase) {
        if case.passed() && !self.verbose {
            return;
        }
        let indent = "    ".repeat(case.depth());
        let label = match case.outcome() {
            Outcome::Passed => case.outcome().as_str().green().to_string(),
            Outcome::Failed => case.outcome().as_str().red().bold().to_string(),
            Outcome::NotYetRun => case.outcome().as_str().yellow().to_string(),
        };
        self.write_line(&format!(
            "{}--- {}: {} ({})",
            indent,
            label,
            case.path(),
            seconds(case.elapsed())
        ));
        for entry in case.output() {
            for line in entry.lines() {
                self.write_line(&format!("{}    {}", indent, line));
            }
        }
    }

    fn summary(&mut self, summary: &RunSummary) {
        if summary.passed() {
            if self.verbose {
                self.write_line(&"PASS".green().to_string());
            }
            self.write_line(&format!(
                "ok  \t{}\t{}",
                summary.suite(),
                seconds(summary.elapsed())
            ));
        } else {
            self.write_line(&"FAIL".red().bold().to_string());
            self.write_line(&format!(
                "FAIL\t{}\t{}",
                summary.suite(),
                seconds(summary.elapsed())
            ));
        }
    }
}

/// Action of a JSON report event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Run,
    Output,
    Pass,
    Fail,
}

/// One line of the JSON report
#[derive(Debug, Serialize)]
pub struct JsonEvent<'a> {
    pub action: Action,
    pub suite: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<f64>,
}

/// Reporter that writes one JSON object per line
///
/// Lines look like `{"action":"fail","suite":"bal","test":"TestWithSubTests","elapsed":0.0}`.
pub struct JsonReporter<W: Write> {
    out: W,
    suite: String,
    error: Option<io::Error>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W, suite: &str) -> Self {
        Self {
            out,
            suite: suite.to_string(),
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &JsonEvent<'_>) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.out, event)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn start(&mut self, path: &str) {
        let suite = self.suite.clone();
        self.emit(&JsonEvent {
            action: Action::Run,
            suite: &suite,
            test: Some(path),
            output: None,
            elapsed: None,
        });
    }

    fn finish(&mut self, case: &TestCase) {
        let suite = self.suite.clone();
        for line in case.output() {
            self.emit(&JsonEvent {
                action: Action::Output,
                suite: &suite,
                test: Some(case.path()),
                output: Some(line.as_str()),
                elapsed: None,
            });
        }
        self.emit(&JsonEvent {
            action: if case.passed() { Action::Pass } else { Action::Fail },
            suite: &suite,
            test: Some(case.path()),
            output: None,
            elapsed: Some(case.elapsed().as_secs_f64()),
        });
    }

    fn summary(&mut self, summary: &RunSummary) {
        let suite = self.suite.clone();
        self.emit(&JsonEvent {
            action: if summary.passed() { Action::Pass } else { Action::Fail },
            suite: &suite,
            test: None,
            output: None,
            elapsed: Some(summary.elapsed().as_secs_f64()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::RunnerConfig;
    use crate::testing::{RunFilter, Suite};

    fn sample_suite() -> Suite {
        let mut suite = Suite::new("sample");
        suite
            .add("TestSample", |t| {
                t.run("good", |_t| Ok(()));
                t.run("bad one", |t| {
                    t.log("first line\nsecond line");
                    t.fail();
                    Ok(())
                });
                Ok(())
            })
            .unwrap();
        suite
    }

    fn console_output(verbose: bool) -> String {
        colored::control::set_override(false);
        let mut reporter = ConsoleReporter::new(Vec::new(), verbose);
        sample_suite().run(&RunFilter::all(), &mut reporter, &RunnerConfig::default());
        assert!(reporter.take_error().is_none());
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_console_reports_failures_only_by_default() {
        let text = console_output(false);
        assert!(!text.contains("=== RUN"));
        assert!(!text.contains("TestSample/good"));
        assert!(text.contains("    --- FAIL: TestSample/bad_one ("));
        assert!(text.contains("        first line\n        second line\n"));
        assert!(text.contains("--- FAIL: TestSample ("));
        assert!(text.contains("FAIL\tsample\t"));
    }

    #[test]
    fn test_console_verbose_reports_everything() {
        let text = console_output(true);
        assert!(text.contains("=== RUN   TestSample\n"));
        assert!(text.contains("=== RUN   TestSample/good\n"));
        assert!(text.contains("    --- PASS: TestSample/good ("));
    }

    #[test]
    fn test_json_lines() {
        let mut reporter = JsonReporter::new(Vec::new(), "sample");
        sample_suite().run(&RunFilter::all(), &mut reporter, &RunnerConfig::default());
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        let actions: Vec<&str> = events
            .iter()
            .map(|e| e["action"].as_str().unwrap())
            .collect();
        assert_eq!(
            actions,
            vec!["run", "run", "pass", "run", "output", "fail", "fail", "fail"]
        );
        assert_eq!(events[4]["test"], "TestSample/bad_one");
        assert_eq!(events[4]["output"], "first line\nsecond line");
        assert!(events[7].get("test").is_none());
        assert_eq!(events[7]["suite"], "sample");
    }
}
