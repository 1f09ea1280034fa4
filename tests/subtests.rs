//! Library-level tests for subtest registration and outcome aggregation
//!
//! These drive the public API the way an embedding host would: build a
//! suite from closures and named functions, run it, inspect the records.

use subtest::common::config::RunnerConfig;
use subtest::testing::{Event, MemoryReporter, RunSummary};
use subtest::{Flow, Outcome, RunFilter, Suite, T};

fn run(suite: &Suite) -> (RunSummary, MemoryReporter) {
    let mut reporter = MemoryReporter::default();
    let summary = suite.run(&RunFilter::all(), &mut reporter, &RunnerConfig::default());
    (summary, reporter)
}

/// A body defined ahead of time and passed by name
fn check_inventory(t: &mut T<'_>) -> Flow {
    let stock = 3;
    if stock < 5 {
        t.fatal(format!("stock too low: {}", stock))?;
    }
    t.log("unreachable");
    Ok(())
}

#[test]
fn test_named_and_inline_bodies_behave_the_same() {
    let mut suite = Suite::new("bodies");
    suite
        .add("TestBodies", |t| {
            t.run("named", check_inventory);
            t.run("inline", |t| {
                let stock = 3;
                if stock < 5 {
                    t.fatal(format!("stock too low: {}", stock))?;
                }
                t.log("unreachable");
                Ok(())
            });
            Ok(())
        })
        .unwrap();

    let (summary, _) = run(&suite);
    let named = summary.find("TestBodies/named").unwrap();
    let inline = summary.find("TestBodies/inline").unwrap();
    assert_eq!(named.outcome(), inline.outcome());
    assert_eq!(named.output(), inline.output());
    assert_eq!(named.output(), ["stock too low: 3"]);
}

#[test]
fn test_dependent_logic_uses_run_result() {
    let mut suite = Suite::new("dependent");
    suite
        .add("TestSetupThenUse", |t| {
            if !t.run("setup", |t| t.fatal("no database")) {
                t.log("skipping use: setup failed");
                return Ok(());
            }
            t.run("use", |_t| Ok(()));
            Ok(())
        })
        .unwrap();

    let (summary, reporter) = run(&suite);
    let root = &summary.cases()[0];
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.output(), ["skipping use: setup failed"]);
    assert_eq!(root.outcome(), Outcome::Failed);
    assert_eq!(
        reporter.finished_paths(),
        vec!["TestSetupThenUse/setup", "TestSetupThenUse"]
    );
}

#[test]
fn test_outcome_is_failed_iff_own_signal_or_child_failed() {
    // (own failure, child failures) -> expected parent outcome
    let cases: [(bool, [bool; 2]); 4] = [
        (false, [false, false]),
        (true, [false, false]),
        (false, [false, true]),
        (true, [true, true]),
    ];

    for (own, children) in cases {
        let mut suite = Suite::new("matrix");
        suite
            .add("TestMatrix", move |t| {
                for (i, fails) in children.iter().enumerate() {
                    let fails = *fails;
                    t.run(&format!("child {}", i), move |t| {
                        if fails {
                            t.fail();
                        }
                        Ok(())
                    });
                }
                if own {
                    t.fail();
                }
                Ok(())
            })
            .unwrap();

        let (summary, _) = run(&suite);
        let expected = if own || children.iter().any(|f| *f) {
            Outcome::Failed
        } else {
            Outcome::Passed
        };
        assert_eq!(summary.cases()[0].outcome(), expected, "own={own} children={children:?}");
    }
}

#[test]
fn test_dynamic_registration_inside_loop_body() {
    let mut suite = Suite::new("dynamic");
    suite
        .add("TestTable", |t| {
            for (input, want) in [(1, 2), (2, 4), (3, 7)] {
                t.run(&format!("double {}", input), move |t| {
                    let got = input * 2;
                    if got != want {
                        t.error(format!("double({}) = {}, want {}", input, got, want));
                    }
                    Ok(())
                });
            }
            Ok(())
        })
        .unwrap();

    let (summary, reporter) = run(&suite);
    let outcomes: Vec<(&str, Outcome)> = reporter
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::Finish { path, outcome, .. } => Some((path.as_str(), *outcome)),
            Event::Start { .. } => None,
        })
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("TestTable/double_1", Outcome::Passed),
            ("TestTable/double_2", Outcome::Passed),
            ("TestTable/double_3", Outcome::Failed),
            ("TestTable", Outcome::Failed),
        ]
    );
    assert_eq!(
        summary.find("TestTable/double_3").unwrap().output(),
        ["double(3) = 6, want 7"]
    );
}

#[test]
fn test_failure_never_propagates_sideways() {
    let mut suite = Suite::new("sideways");
    suite
        .add("TestSiblings", |t| {
            t.run("broken", |t| t.fail_now());
            t.run("healthy", |t| {
                assert!(!t.failed());
                Ok(())
            });
            Ok(())
        })
        .unwrap();

    let (summary, _) = run(&suite);
    assert!(summary.find("TestSiblings/healthy").unwrap().passed());
    assert!(!summary.find("TestSiblings/broken").unwrap().passed());
}
