//! Error types for golden fixtures.
//!
//! Fatal conditions are [`GoldenError`]s. Non-fatal diagnostics are
//! [`UsageWarning`](crate::UsageWarning)s and never fail a test on their own.

use golden_fixture_store::StoreError;
use std::io;
use thiserror::Error;

/// Errors that abort a golden test.
#[derive(Debug, Error)]
pub enum GoldenError {
    /// The fixture or the API is being used in a way that can never be meaningful.
    #[error("usage error: {0}")]
    Usage(String),

    /// A required input key is absent from the fixture file.
    #[error("missing key '{key}' in {path}")]
    MissingKey { key: String, path: String },

    /// An input exists but does not deserialize into the requested type.
    #[error("input '{key}' in {path}: {message}")]
    Input {
        key: String,
        path: String,
        message: String,
    },

    /// An actual value cannot be represented in a fixture file.
    #[error("cannot record a value for '{key}': {message}")]
    Serialize { key: String, message: String },

    /// Reading, parsing or persisting the fixture file failed.
    #[error(transparent)]
    Store(StoreError),

    /// Walking a fixture directory failed.
    #[error("failed to read fixture directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for golden fixture operations.
pub type GoldenResult<T> = Result<T, GoldenError>;

impl From<StoreError> for GoldenError {
    fn from(err: StoreError) -> Self {
        match err {
            err @ StoreError::NotATable { .. } => GoldenError::Usage(err.to_string()),
            other => GoldenError::Store(other),
        }
    }
}
