//! Fixture sessions: one [`GoldenTest`] per test, one [`Golden`] per fixture file.

use crate::config::{hook_disabled_warning, GoldenConfig, Mode};
use crate::event::{CallSite, Event, FixtureId};
use crate::placeholder::{to_actual, Expected};
use crate::reconcile::{apply, reconcile, unused_fields};
use crate::recorder::{Recorder, Scope, SharedRecorder};
use crate::warning::{UsageWarning, WarningKind};
use crate::{GoldenError, GoldenResult};
use golden_fixture_store::{load_table, FixtureDocument};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Outcome of the test body, passed to teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    pub passed: bool,
}

/// What teardown did.
///
/// Warnings are also logged as `tracing` events under the `golden_fixture`
/// target, which only show up when a subscriber is installed. Check
/// `warnings` in the test to make sure none go unnoticed.
#[must_use = "the report carries usage warnings"]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeardownReport {
    /// Every warning raised during the test, in the order it was raised.
    pub warnings: Vec<UsageWarning>,
    /// Fixture files whose content changed on disk.
    pub updated: Vec<PathBuf>,
}

impl TeardownReport {
    pub fn warnings_of(&self, kind: WarningKind) -> Vec<&UsageWarning> {
        self.warnings.iter().filter(|w| w.kind == kind).collect()
    }
}

/// One golden test invocation.
///
/// Owns the event log shared by every fixture file the test opens, and
/// reconciles each of them at teardown.
///
/// ```no_run
/// use golden_fixture::{golden_assert_eq, GoldenTest};
///
/// let report = GoldenTest::from_env()
///     .run("tests/golden/double.toml", |golden| {
///         let n: i64 = golden.input("n").unwrap();
///         golden_assert_eq!(golden, golden.out("doubled"), n * 2);
///     })
///     .unwrap();
/// assert!(report.warnings.is_empty(), "{:?}", report.warnings);
/// ```
pub struct GoldenTest {
    name: String,
    config: GoldenConfig,
    base_dir: Option<PathBuf>,
    recorder: SharedRecorder,
    fixtures: RefCell<Vec<Golden>>,
}

impl GoldenTest {
    /// Start a test. The caller's source file is treated as the test body.
    ///
    /// With the assertion hook off, the report of every such test starts with
    /// an [`AssertionHookDisabled`](WarningKind::AssertionHookDisabled) warning.
    #[track_caller]
    pub fn new(config: GoldenConfig) -> Self {
        let name = std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string();
        let site = CallSite::caller();
        let recorder = Recorder::shared(site);
        if !config.assertion_hook {
            // Already logged once when the config was built.
            recorder
                .borrow_mut()
                .defer_warning(hook_disabled_warning(site));
        }
        Self {
            name,
            config,
            base_dir: None,
            recorder,
            fixtures: RefCell::new(Vec::new()),
        }
    }

    /// Start a test configured from the environment.
    #[track_caller]
    pub fn from_env() -> Self {
        Self::new(GoldenConfig::from_env())
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resolve relative fixture paths against `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &GoldenConfig {
        &self.config
    }

    /// Open a fixture file owned by this test.
    pub fn open(&self, path: impl AsRef<Path>) -> GoldenResult<Golden> {
        let path = match &self.base_dir {
            Some(base) => base.join(path.as_ref()),
            None => path.as_ref().to_path_buf(),
        };
        let inputs = load_table(&path)?;
        tracing::debug!(path = %path.display(), keys = inputs.len(), "opened fixture");

        let id = self.recorder.borrow_mut().next_fixture_id();
        let golden = Golden {
            state: Rc::new(FixtureState {
                id,
                path,
                config: self.config.clone(),
                inputs,
                used_keys: RefCell::new(BTreeSet::new()),
                recorder: Rc::clone(&self.recorder),
            }),
        };
        self.fixtures.borrow_mut().push(golden.clone());
        Ok(golden)
    }

    /// Snapshot of the event log.
    pub fn events(&self) -> Vec<Event> {
        self.recorder.borrow().events().to_vec()
    }

    /// Reconcile and persist every owned fixture. A no-op in compare mode.
    pub fn teardown(&self, outcome: &TestOutcome) -> GoldenResult<TeardownReport> {
        let mut report = TeardownReport::default();
        for golden in self.fixtures.borrow().iter() {
            let file = golden.teardown(outcome)?;
            report.warnings.extend(file.warnings);
            report.updated.extend(file.updated);
        }

        let mut early = self.recorder.borrow_mut().take_warnings();
        early.append(&mut report.warnings);
        report.warnings = early;
        Ok(report)
    }

    /// Open `path`, run `body`, then tear down.
    ///
    /// Teardown runs even when `body` panics; the panic is resumed afterwards.
    pub fn run<F>(self, path: impl AsRef<Path>, body: F) -> GoldenResult<TeardownReport>
    where
        F: FnOnce(&Golden),
    {
        let golden = self.open(path)?;
        let result = panic::catch_unwind(AssertUnwindSafe(|| body(&golden)));
        let outcome = TestOutcome {
            name: self.name.clone(),
            passed: result.is_ok(),
        };
        let report = self.teardown(&outcome);

        if let Err(payload) = result {
            if let Err(err) = &report {
                tracing::error!(test = %self.name, error = %err, "teardown failed");
            }
            panic::resume_unwind(payload);
        }
        report
    }

    #[doc(hidden)]
    pub fn begin_assertion(&self, site: CallSite) -> Scope {
        Scope::assertion(&self.recorder, site)
    }

    #[doc(hidden)]
    pub fn assertion_passed(&self, site: CallSite) {
        if self.config.is_update() && self.config.assertion_hook {
            self.recorder.borrow_mut().record_assertion_pass(site);
        }
    }
}

pub(crate) struct FixtureState {
    pub(crate) id: FixtureId,
    pub(crate) path: PathBuf,
    pub(crate) config: GoldenConfig,
    inputs: toml::Table,
    used_keys: RefCell<BTreeSet<String>>,
    pub(crate) recorder: SharedRecorder,
}

impl FixtureState {
    /// Value stored in the file when the session started.
    pub(crate) fn stored(&self, key: &str) -> Option<&toml::Value> {
        self.inputs.get(key)
    }

    fn mark_used(&self, key: &str) {
        self.used_keys.borrow_mut().insert(key.to_string());
    }
}

/// Handle to one fixture file.
///
/// Cloning is cheap; clones share the same session.
#[derive(Clone)]
pub struct Golden {
    state: Rc<FixtureState>,
}

impl Golden {
    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn mode(&self) -> Mode {
        self.state.config.mode
    }

    /// Read a required input.
    ///
    /// The value is deserialized fresh on every call, so mutating it never
    /// affects the fixture.
    pub fn input<T: DeserializeOwned>(&self, key: &str) -> GoldenResult<T> {
        let value = self.input_value(key)?;
        self.deserialize(key, value)
    }

    /// Read an input, falling back to `default` when it is absent.
    pub fn input_or<T: DeserializeOwned>(&self, key: &str, default: T) -> GoldenResult<T> {
        self.state.mark_used(key);
        match self.state.stored(key) {
            Some(value) => self.deserialize(key, value.clone()),
            None => Ok(default),
        }
    }

    /// Read a required input as a raw TOML value.
    pub fn input_value(&self, key: &str) -> GoldenResult<toml::Value> {
        self.state.mark_used(key);
        self.state
            .stored(key)
            .cloned()
            .ok_or_else(|| GoldenError::MissingKey {
                key: key.to_string(),
                path: self.state.path.display().to_string(),
            })
    }

    /// The literal value stored for `key` when the test started.
    pub fn stored(&self, key: &str) -> Option<toml::Value> {
        self.state.stored(key).cloned()
    }

    /// Placeholder for a required output.
    pub fn out(&self, key: &str) -> Expected {
        self.state.mark_used(key);
        Expected::new(Rc::clone(&self.state), key, false)
    }

    /// Placeholder for an output that may be absent.
    ///
    /// Comparing it against a missing value (`None`) removes the key in update mode.
    pub fn out_opt(&self, key: &str) -> Expected {
        self.state.mark_used(key);
        Expected::new(Rc::clone(&self.state), key, true)
    }

    /// Assert that `actual` is the golden output for `key`.
    ///
    /// Equivalent to `golden_assert_eq!(golden, golden.out(key), actual)`.
    #[track_caller]
    pub fn assert_out<T: Serialize + ?Sized>(&self, key: &str, actual: &T) {
        let site = CallSite::caller();
        let actual = to_actual(key, actual).unwrap_or_else(|err| panic!("{}", err));
        self.check(self.out(key), actual, site);
    }

    /// Like [`assert_out`](Self::assert_out) for an output that may be absent.
    #[track_caller]
    pub fn assert_out_opt<T: Serialize + ?Sized>(&self, key: &str, actual: &T) {
        let site = CallSite::caller();
        let actual = to_actual(key, actual).unwrap_or_else(|err| panic!("{}", err));
        self.check(self.out_opt(key), actual, site);
    }

    /// Run `body` with comparisons recorded wherever they happen.
    pub fn approved<R>(&self, body: impl FnOnce() -> R) -> R {
        let _scope = Scope::approved(&self.state.recorder);
        body()
    }

    pub(crate) fn check(&self, expected: Expected, actual: Option<toml::Value>, site: CallSite) {
        let passed = {
            let _assertion = self.begin_assertion(site);
            expected.compare_value(actual.clone(), true, site)
        };
        if passed {
            self.assertion_passed(site);
        } else {
            panic!(
                "assertion failed at {}: {:?} == {}",
                site,
                expected,
                crate::event::display_actual(actual.as_ref())
            );
        }
    }

    pub(crate) fn approved_scope(&self) -> Scope {
        Scope::approved(&self.state.recorder)
    }

    #[doc(hidden)]
    pub fn begin_assertion(&self, site: CallSite) -> Scope {
        Scope::assertion(&self.state.recorder, site)
    }

    #[doc(hidden)]
    pub fn assertion_passed(&self, site: CallSite) {
        // Pass events only matter to update-mode reconciliation.
        if self.state.config.is_update() && self.state.config.assertion_hook {
            self.state.recorder.borrow_mut().record_assertion_pass(site);
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, key: &str, value: toml::Value) -> GoldenResult<T> {
        value.try_into::<T>().map_err(|e| GoldenError::Input {
            key: key.to_string(),
            path: self.state.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Reconcile this file against the event log and persist it.
    fn teardown(&self, outcome: &TestOutcome) -> GoldenResult<TeardownReport> {
        let state = &self.state;
        if state.config.mode == Mode::Compare {
            return Ok(TeardownReport::default());
        }

        let (reconciliation, test_site) = {
            let mut recorder = state.recorder.borrow_mut();
            let reconciliation = reconcile(
                recorder.events_mut(),
                state.id,
                state.config.assertion_hook,
            );
            (reconciliation, recorder.test_site())
        };
        let mut warnings = reconciliation.warnings;

        let mut doc = FixtureDocument::load(&state.path)?;
        let changed = apply(&mut doc, &reconciliation.map);

        let unused = unused_fields(&doc, &state.used_keys.borrow());
        if !unused.is_empty() {
            let fields = unused
                .iter()
                .map(|key| format!("'{}'", key))
                .collect::<Vec<_>>()
                .join(", ");
            warnings.push(UsageWarning::new(
                WarningKind::UnusedFields,
                format!("Unused field(s) {} in {}", fields, outcome.name),
                test_site,
            ));
        }
        for warning in &warnings {
            warning.emit();
        }

        let mut updated = Vec::new();
        if changed {
            doc.persist()?;
            updated.push(state.path.clone());
        }
        tracing::debug!(
            path = %state.path.display(),
            test = %outcome.name,
            passed = outcome.passed,
            keys = reconciliation.map.len(),
            changed,
            "reconciled fixture"
        );

        Ok(TeardownReport { warnings, updated })
    }
}
