//! Events recorded while a golden test runs.

use std::fmt;
use std::panic::Location;

/// Index of a fixture file within one [`GoldenTest`](crate::GoldenTest).
pub type FixtureId = usize;

/// Source location a comparison or assertion is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the caller, following `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A placeholder compared against an actual value.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEvent {
    pub fixture: FixtureId,
    pub key: String,
    /// `None` when the actual value was missing.
    pub actual: Option<toml::Value>,
    pub optional: bool,
    /// `true` for `==`, `false` for `!=`.
    pub is_equality: bool,
    /// Set during reconciliation once a passing assertion covers the call site.
    pub approved: bool,
    pub call_site: CallSite,
    /// Position in the event log.
    pub seq: usize,
}

impl ComparisonEvent {
    /// `actual == golden.out['key']`, as shown in diagnostics.
    pub fn describe(&self) -> String {
        let op = if self.is_equality { "==" } else { "!=" };
        format!(
            "{} {} golden.out['{}']",
            display_actual(self.actual.as_ref()),
            op,
            self.key
        )
    }
}

/// A passing assertion on `call_site.line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssertionPassEvent {
    pub call_site: CallSite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Comparison(ComparisonEvent),
    AssertionPass(AssertionPassEvent),
}

pub(crate) fn display_actual(value: Option<&toml::Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<absent>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_comparison() {
        let event = ComparisonEvent {
            fixture: 0,
            key: "doubled".into(),
            actual: Some(toml::Value::Integer(6)),
            optional: false,
            is_equality: true,
            approved: false,
            call_site: CallSite::new("tests/a.rs", 3),
            seq: 0,
        };
        assert_eq!(event.describe(), "6 == golden.out['doubled']");

        let absent = ComparisonEvent {
            actual: None,
            is_equality: false,
            ..event
        };
        assert_eq!(absent.describe(), "<absent> != golden.out['doubled']");
    }

    #[test]
    fn test_caller_site() {
        let site = CallSite::caller();
        assert_eq!(site.file, file!());
        assert_eq!(site.line, line!() - 2);
    }
}
