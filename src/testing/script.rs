//! Scripted test suites
//!
//! Defines the YAML format for suites whose test bodies are step lists, and
//! turns a loaded script into a runnable `Suite`.
//!
//! ```yaml
//! name: subtest_bar
//! bodies:
//!   my_func:
//!     - action: fail_now
//! tests:
//!   - name: TestWithSubTests
//!     steps:
//!       - action: run
//!         name: subtest with function literal
//!         steps:
//!           - action: fail
//!       - action: run_named
//!         name: subtest with identifier
//!         body: my_func
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::rc::Rc;

use crate::common::{Error, Result};

use super::context::{Flow, T};
use super::suite::Suite;

/// A suite loaded from a YAML file
#[derive(Deserialize, Debug, Clone)]
pub struct ScriptSuite {
    /// Name of the suite, used in reports
    pub name: String,
    /// Optional description of what the suite covers
    pub description: Option<String>,
    /// Reusable bodies, referenced by `run_named` steps
    #[serde(default)]
    pub bodies: BTreeMap<String, Vec<Step>>,
    /// Top-level tests in execution order
    pub tests: Vec<ScriptTest>,
}

/// A top-level scripted test
#[derive(Deserialize, Debug, Clone)]
pub struct ScriptTest {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A single statement of a scripted body
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Record a diagnostic line
    Log { message: String },
    /// Mark failed and continue
    Fail,
    /// Mark failed and stop this body
    FailNow,
    /// Log, then mark failed and continue
    Error { message: String },
    /// Log, then mark failed and stop this body
    Fatal { message: String },
    /// Run a subtest with an inline body
    Run {
        name: String,
        #[serde(default)]
        steps: Vec<Step>,
    },
    /// Run a subtest whose body is defined under `bodies`
    RunNamed { name: String, body: String },
}

/// A line of `ScriptSuite::outline`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub name: String,
}

impl ScriptSuite {
    /// Load and validate a suite file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        Self::parse(&content).map_err(|e| match e {
            Error::SuiteParse { error, .. } => Error::SuiteParse {
                path: path.display().to_string(),
                error,
            },
            other => other,
        })
    }

    /// Parse and validate suite YAML
    pub fn parse(content: &str) -> Result<Self> {
        let suite: ScriptSuite = serde_yaml::from_str(content).map_err(|e| Error::SuiteParse {
            path: "<inline>".to_string(),
            error: e.to_string(),
        })?;
        suite.validate()?;
        Ok(suite)
    }

    /// Every `run_named` step must reference a defined body
    fn validate(&self) -> Result<()> {
        fn check(
            owner: &str,
            steps: &[Step],
            bodies: &BTreeMap<String, Vec<Step>>,
        ) -> Result<()> {
            for step in steps {
                match step {
                    Step::Run { name, steps } => check(name, steps, bodies)?,
                    Step::RunNamed { body, .. } if !bodies.contains_key(body) => {
                        return Err(Error::UnknownBody {
                            test: owner.to_string(),
                            body: body.clone(),
                        });
                    }
                    _ => {}
                }
            }
            Ok(())
        }

        for (name, steps) in &self.bodies {
            check(name, steps, &self.bodies)?;
        }
        for test in &self.tests {
            check(&test.name, &test.steps, &self.bodies)?;
        }
        Ok(())
    }

    /// Statically known test names, depth-first
    ///
    /// A named body that (directly or indirectly) runs itself is expanded
    /// once; the recursive reference is listed but not descended into.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        fn walk<'s>(
            steps: &'s [Step],
            depth: usize,
            bodies: &'s BTreeMap<String, Vec<Step>>,
            active: &mut HashSet<&'s str>,
            out: &mut Vec<OutlineEntry>,
        ) {
            for step in steps {
                match step {
                    Step::Run { name, steps } => {
                        out.push(OutlineEntry {
                            depth,
                            name: name.clone(),
                        });
                        walk(steps, depth + 1, bodies, active, out);
                    }
                    Step::RunNamed { name, body } => {
                        out.push(OutlineEntry {
                            depth,
                            name: name.clone(),
                        });
                        if let Some(steps) = bodies.get(body) {
                            if active.insert(body.as_str()) {
                                walk(steps, depth + 1, bodies, active, out);
                                active.remove(body.as_str());
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut out = Vec::new();
        for test in &self.tests {
            out.push(OutlineEntry {
                depth: 0,
                name: test.name.clone(),
            });
            walk(&test.steps, 1, &self.bodies, &mut HashSet::new(), &mut out);
        }
        out
    }

    /// Build a runnable suite
    pub fn into_suite(self) -> Result<Suite> {
        let mut suite = Suite::new(self.name.clone());
        let bodies = Rc::new(self.bodies);
        for test in self.tests {
            let bodies = Rc::clone(&bodies);
            let steps = test.steps;
            suite.add(&test.name, move |t| execute_steps(t, &steps, &bodies))?;
        }
        Ok(suite)
    }
}

/// Interpret a step list against the running test
fn execute_steps(t: &mut T<'_>, steps: &[Step], bodies: &BTreeMap<String, Vec<Step>>) -> Flow {
    for step in steps {
        match step {
            Step::Log { message } => t.log(message.as_str()),
            Step::Fail => t.fail(),
            Step::FailNow => t.fail_now()?,
            Step::Error { message } => t.error(message.as_str()),
            Step::Fatal { message } => t.fatal(message.as_str())?,
            Step::Run { name, steps } => {
                t.run(name, |t| execute_steps(t, steps, bodies));
            }
            Step::RunNamed { name, body } => match bodies.get(body) {
                Some(steps) => {
                    t.run(name, |t| execute_steps(t, steps, bodies));
                }
                None => t.fatal(format!("unknown body '{}'", body))?,
            },
        }
    }
    Ok(())
}
