//! Golden-file testing with assertion-aware fixture updates.
//!
//! A test reads inputs from a TOML fixture file and compares its actual
//! outputs against placeholders for the expected ones. Run normally, the
//! placeholders compare against the stored values. Run with
//! `UPDATE_GOLDENS=1`, the comparisons are recorded instead, and at teardown
//! the fixture is rewritten with the values the test actually asserted:
//! comments, key order and unrelated keys are left as they were.
//!
//! ## Example
//!
//! ```no_run
//! use golden_fixture::{golden_assert, GoldenTest};
//!
//! #[test]
//! fn doubles() {
//!     let report = GoldenTest::from_env()
//!         .run("tests/golden/double.toml", |golden| {
//!             let n: i64 = golden.input("n").unwrap();
//!             golden_assert!(golden, golden.out("doubled") == n * 2);
//!         })
//!         .unwrap();
//!     assert!(report.warnings.is_empty(), "{:?}", report.warnings);
//! }
//! ```
//!
//! ## Which comparisons are written
//!
//! In update mode every `==` on a placeholder evaluates to `true` and is
//! recorded. At teardown only recorded comparisons covered by a passing
//! [`golden_assert!`] (or [`golden_assert_eq!`], [`Golden::assert_out`] and
//! the `may_raise` / `capture_logs` helpers) are written back. A comparison
//! evaluated anywhere else, say in an `if`, is reported as a
//! [`UsageWarning`] and ignored.
//!
//! ## Warnings
//!
//! Every [`UsageWarning`] is returned in the [`TeardownReport`] and logged
//! with `tracing::warn!` under the `golden_fixture` target. `cargo test`
//! installs no subscriber, so the log lines are only visible with one in place
//! (`tracing-test`'s `#[traced_test]`, or any `tracing-subscriber` setup).
//! Asserting on `report.warnings` works without one.
//!
//! ## Modules
//!
//! - [`session`] - Fixture sessions, input access and teardown
//! - [`placeholder`] - Output placeholders
//! - [`reconcile`] - Computing and applying the final values
//! - [`event`] - Comparison and assertion events
//! - [`config`] - Compare/update mode and the assertion hook
//! - [`failure`] - Recording expected failures (`may_raise`)
//! - [`logs`] - Recording captured log lines (`capture_logs`)
//! - [`discover`] - Enumerating fixture files

pub mod config;
pub mod discover;
pub mod errors;
pub mod event;
pub mod failure;
pub mod logs;
pub mod placeholder;
pub mod reconcile;
mod recorder;
pub mod session;
pub mod warning;

pub use config::{GoldenConfig, Mode};
pub use errors::{GoldenError, GoldenResult};
pub use event::{AssertionPassEvent, CallSite, ComparisonEvent, Event, FixtureId};
pub use failure::FailureKind;
pub use logs::LogCapture;
pub use placeholder::Expected;
pub use reconcile::{Reconciled, ReconciledMap};
pub use recorder::Scope;
pub use session::{Golden, GoldenTest, TeardownReport, TestOutcome};
pub use warning::{UsageWarning, WarningKind};

/// Assert a condition, certifying the golden comparisons it evaluated.
///
/// Behaves like [`assert!`]. When the condition holds, a pass is recorded for
/// this line so the placeholder comparisons inside it are written in update
/// mode. When it fails, the message lists every placeholder comparison that
/// came out false, with the stored value.
///
/// ```no_run
/// # use golden_fixture::{golden_assert, GoldenTest};
/// # let test = GoldenTest::from_env();
/// # let golden = test.open("golden.toml").unwrap();
/// golden_assert!(golden, golden.out("answer") == 42);
/// golden_assert!(golden, golden.out_opt("note") == None::<String>, "note should be gone");
/// ```
#[macro_export]
macro_rules! golden_assert {
    ($golden:expr, $cond:expr $(,)?) => {
        $crate::golden_assert!($golden, $cond, "assertion failed: {}", stringify!($cond))
    };
    ($golden:expr, $cond:expr, $($arg:tt)+) => {{
        let __golden = &$golden;
        let __site = $crate::CallSite::new(file!(), line!());
        let __assertion = __golden.begin_assertion(__site);
        let __passed: bool = $cond;
        let __details = __assertion.failure_details();
        ::core::mem::drop(__assertion);
        if __passed {
            __golden.assertion_passed(__site);
        } else {
            panic!("{}{}", format_args!($($arg)+), __details);
        }
    }};
}

/// Assert that a golden placeholder equals an actual value.
///
/// The placeholder goes first: `golden_assert_eq!(golden, golden.out("k"), actual)`.
#[macro_export]
macro_rules! golden_assert_eq {
    ($golden:expr, $expected:expr, $actual:expr $(,)?) => {{
        let __golden = &$golden;
        let __site = $crate::CallSite::new(file!(), line!());
        let _assertion = __golden.begin_assertion(__site);
        match (&$expected, &$actual) {
            (expected, actual) => {
                let passed = *expected == *actual;
                ::core::mem::drop(_assertion);
                if passed {
                    __golden.assertion_passed(__site);
                } else {
                    panic!(
                        "assertion `left == right` failed\n  left: {:?}\n right: {:?}",
                        expected, actual
                    );
                }
            }
        }
    }};
}
