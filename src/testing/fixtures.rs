//! Built-in fixture suites
//!
//! Two small suites used to check subtest discovery: `subtest_bar` runs three
//! failing subtests under `TestWithSubTests`, `bal` runs the first two. Both
//! define a top-level test with the same name, so each is its own suite.

use crate::common::{Error, Result};

use super::context::{Flow, T};
use super::suite::Suite;

/// Names accepted by `fixture`
pub const FIXTURES: &[&str] = &["subtest_bar", "bal"];

/// Look up a built-in fixture suite by name
pub fn fixture(name: &str) -> Result<Suite> {
    match name {
        "subtest_bar" => subtest_bar(),
        "bal" => bal(),
        _ => Err(Error::unknown_fixture(name, FIXTURES)),
    }
}

/// Three subtests: an inline body, a body bound to a variable, and one that
/// logs before failing
pub fn subtest_bar() -> Result<Suite> {
    let mut suite = Suite::new("subtest_bar");
    suite.add("TestWithSubTests", |t| {
        t.run("subtest with function literal", |t| {
            t.fail();
            Ok(())
        });
        let my_func: fn(&mut T<'_>) -> Flow = |t| t.fail_now();
        t.run("subtest with identifier", my_func);
        t.run("another subtest", |t| {
            t.log("test");
            t.fail();
            Ok(())
        });
        Ok(())
    })?;
    Ok(suite)
}

/// The first two subtests of `subtest_bar`
pub fn bal() -> Result<Suite> {
    let mut suite = Suite::new("bal");
    suite.add("TestWithSubTests", |t| {
        t.run("subtest with function literal", |t| {
            t.fail();
            Ok(())
        });
        let my_func: fn(&mut T<'_>) -> Flow = |t| t.fail_now();
        t.run("subtest with identifier", my_func);
        Ok(())
    })?;
    Ok(suite)
}
