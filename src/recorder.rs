//! Comparison recording.
//!
//! Every placeholder comparison reaches [`Recorder::record_comparison`] the
//! moment its truth value is produced. Whether it is kept depends on the
//! context it ran in:
//!
//! - inside a `golden_assert!` the comparison is kept and attributed to the
//!   assertion's line, whichever file the comparison itself lives in
//! - inside an approved scope (`may_raise`, `capture_logs`, `Golden::approved`)
//!   it is kept at its own call site
//! - otherwise it is kept only when its call site is in the test's own file
//!
//! Comparisons that fail all three never reach the event log and are invisible
//! to reconciliation.

use crate::event::{AssertionPassEvent, CallSite, ComparisonEvent, Event, FixtureId};
use crate::warning::UsageWarning;
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) type SharedRecorder = Rc<RefCell<Recorder>>;

/// Event log shared by every fixture file of one test.
#[derive(Debug)]
pub(crate) struct Recorder {
    events: Vec<Event>,
    test_site: CallSite,
    approved_scopes: usize,
    assertions: Vec<AssertionFrame>,
    warnings: Vec<UsageWarning>,
    fixtures: usize,
}

impl Recorder {
    pub fn new(test_site: CallSite) -> Self {
        Self {
            events: Vec::new(),
            test_site,
            approved_scopes: 0,
            assertions: Vec::new(),
            warnings: Vec::new(),
            fixtures: 0,
        }
    }

    pub fn shared(test_site: CallSite) -> SharedRecorder {
        Rc::new(RefCell::new(Self::new(test_site)))
    }

    pub fn test_site(&self) -> CallSite {
        self.test_site
    }

    pub fn next_fixture_id(&mut self) -> FixtureId {
        let id = self.fixtures;
        self.fixtures += 1;
        id
    }

    /// Site a comparison made at `site` is attributed to, if it is recorded at all.
    pub fn attribute(&self, site: CallSite) -> Option<CallSite> {
        if let Some(assertion) = self.assertions.last() {
            return Some(assertion.site);
        }
        if self.approved_scopes > 0 || site.file == self.test_site.file {
            Some(site)
        } else {
            None
        }
    }

    /// Append `event` if its context is approved. Returns whether it was kept.
    pub fn record_comparison(&mut self, mut event: ComparisonEvent) -> bool {
        let site = match self.attribute(event.call_site) {
            Some(site) => site,
            None => {
                tracing::trace!(
                    key = %event.key,
                    site = %event.call_site,
                    "comparison outside the test ignored"
                );
                return false;
            }
        };
        event.call_site = site;
        event.seq = self.events.len();
        self.events.push(Event::Comparison(event));
        true
    }

    pub fn record_assertion_pass(&mut self, call_site: CallSite) {
        self.events
            .push(Event::AssertionPass(AssertionPassEvent { call_site }));
    }

    /// Note a comparison that evaluated to `false` inside the innermost assertion.
    pub fn note_mismatch(&mut self, description: String) {
        if let Some(assertion) = self.assertions.last_mut() {
            assertion.mismatches.push(description);
        }
    }

    pub fn push_warning(&mut self, warning: UsageWarning) {
        warning.emit();
        self.warnings.push(warning);
    }

    /// Keep a warning for the report that has already been logged.
    pub fn defer_warning(&mut self, warning: UsageWarning) {
        self.warnings.push(warning);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    pub fn take_warnings(&mut self) -> Vec<UsageWarning> {
        std::mem::take(&mut self.warnings)
    }
}

#[derive(Debug)]
struct AssertionFrame {
    site: CallSite,
    mismatches: Vec<String>,
}

/// Guard for an approved or assertion context; leaving it restores the previous context.
#[must_use]
pub struct Scope {
    recorder: SharedRecorder,
    assertion: bool,
}

impl Scope {
    pub(crate) fn approved(recorder: &SharedRecorder) -> Self {
        recorder.borrow_mut().approved_scopes += 1;
        Self {
            recorder: Rc::clone(recorder),
            assertion: false,
        }
    }

    pub(crate) fn assertion(recorder: &SharedRecorder, site: CallSite) -> Self {
        recorder.borrow_mut().assertions.push(AssertionFrame {
            site,
            mismatches: Vec::new(),
        });
        Self {
            recorder: Rc::clone(recorder),
            assertion: true,
        }
    }

    /// Failed placeholder comparisons seen by this assertion, one per line,
    /// for appending to its panic message.
    #[doc(hidden)]
    pub fn failure_details(&self) -> String {
        let recorder = self.recorder.borrow();
        match recorder.assertions.last() {
            Some(frame) if self.assertion => frame
                .mismatches
                .iter()
                .map(|m| format!("\n  {}", m))
                .collect(),
            _ => String::new(),
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let mut recorder = self.recorder.borrow_mut();
        if self.assertion {
            recorder.assertions.pop();
        } else {
            recorder.approved_scopes -= 1;
        }
    }
}
