//! Subtest runner
//!
//! Tests are closures that receive a `&mut T` handle. From there a test can
//! log, mark itself failed (`fail`, `error`), stop early (`fail_now`,
//! `fatal`), and register subtests with `T::run`, which executes them on the
//! spot and folds their outcome into the parent's. Top-level tests live in a
//! `Suite`; reports go to an injected `Reporter`.

mod case;
mod context;
mod filter;
pub mod fixtures;
mod report;
mod script;
mod suite;

pub use case::{escape_segment, Outcome, TestCase};
pub use context::{Abort, Flow, T};
pub use filter::RunFilter;
pub use report::{Action, ConsoleReporter, Event, JsonEvent, JsonReporter, MemoryReporter, Reporter};
pub use script::{OutlineEntry, ScriptSuite, ScriptTest, Step};
pub use suite::{RunSummary, Suite, TestBody};
