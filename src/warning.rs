//! Non-fatal usage diagnostics.

use crate::event::CallSite;
use std::fmt;

/// What a [`UsageWarning`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A recorded comparison was never part of a passing assertion.
    OutsideAssert,
    /// One key was compared against different actual values.
    ConflictingValues,
    /// Fixture keys the test never read.
    UnusedFields,
    /// `!=` used on a placeholder.
    NotEqualOperator,
    /// The assertion hook is turned off.
    AssertionHookDisabled,
}

/// A diagnostic attributed to the source line that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageWarning {
    pub kind: WarningKind,
    pub message: String,
    pub site: CallSite,
}

impl UsageWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>, site: CallSite) -> Self {
        Self {
            kind,
            message: message.into(),
            site,
        }
    }

    /// Log the warning at its original call site.
    pub(crate) fn emit(&self) {
        tracing::warn!(
            target: "golden_fixture",
            file = self.site.file,
            line = self.site.line,
            kind = ?self.kind,
            "{}",
            self.message
        );
    }
}

impl fmt::Display for UsageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.site, self.message)
    }
}
