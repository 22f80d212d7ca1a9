//! Capturing expected failures as golden outputs.

use crate::event::CallSite;
use crate::session::Golden;
use crate::GoldenError;
use std::borrow::Cow;
use std::fmt;
use std::io;

/// Key [`Golden::may_raise`] records under.
pub const FAILURE_KEY: &str = "exception";

/// A failure with a stable kind tag.
///
/// Recorded as `{ <kind> = "<message>" }`, so the tag should name the
/// variant rather than carry data.
pub trait FailureKind: fmt::Display {
    fn failure_kind(&self) -> Cow<'static, str>;
}

impl FailureKind for io::Error {
    fn failure_kind(&self) -> Cow<'static, str> {
        Cow::Owned(format!("{:?}", io::Error::kind(self)))
    }
}

impl FailureKind for GoldenError {
    fn failure_kind(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            GoldenError::Usage(_) => "Usage",
            GoldenError::MissingKey { .. } => "MissingKey",
            GoldenError::Input { .. } => "Input",
            GoldenError::Serialize { .. } => "Serialize",
            GoldenError::Store(_) => "Store",
            GoldenError::Io { .. } => "Io",
        })
    }
}

impl Golden {
    /// Run `body`, asserting its failure (or the lack of one) against the
    /// `"exception"` output.
    ///
    /// On `Err(e)` the output must equal `{ <kind> = "<message>" }`; on `Ok`
    /// it must be absent. Returns the success value, if any.
    #[track_caller]
    pub fn may_raise<T, E, F>(&self, body: F) -> Option<T>
    where
        E: FailureKind,
        F: FnOnce() -> Result<T, E>,
    {
        self.may_raise_as(FAILURE_KEY, body)
    }

    /// [`may_raise`](Self::may_raise) recording under `key`.
    #[track_caller]
    pub fn may_raise_as<T, E, F>(&self, key: &str, body: F) -> Option<T>
    where
        E: FailureKind,
        F: FnOnce() -> Result<T, E>,
    {
        let site = CallSite::caller();
        let result = {
            let _scope = self.approved_scope();
            body()
        };

        match result {
            Ok(value) => {
                self.check(self.out_opt(key), None, site);
                Some(value)
            }
            Err(err) => {
                let mut failure = toml::Table::new();
                failure.insert(
                    err.failure_kind().into_owned(),
                    toml::Value::String(err.to_string()),
                );
                self.check(self.out_opt(key), Some(toml::Value::Table(failure)), site);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kind() {
        let err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        assert_eq!(err.failure_kind(), "NotFound");
    }

    #[test]
    fn test_golden_error_kind() {
        let err = GoldenError::MissingKey {
            key: "n".into(),
            path: "golden.toml".into(),
        };
        assert_eq!(err.failure_kind(), "MissingKey");
    }
}
