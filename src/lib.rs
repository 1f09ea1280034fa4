//! Subtest runner - nested named subtests with pass/fail aggregation
//!
//! This library provides a small test harness where a running test can
//! register and run named subtests, plus the suite, reporting and scripting
//! pieces a host needs to discover and invoke tests by name.

pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::{Flow, Outcome, RunFilter, Suite, T};
