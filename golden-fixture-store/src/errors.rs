//! Error types for the fixture store.

use std::io;
use thiserror::Error;

/// Errors raised while reading or writing a fixture file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or replacing the file failed.
    #[error("fixture file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML.
    #[error("failed to parse fixture {path}: {message}")]
    Parse { path: String, message: String },

    /// The file parsed, but its top level is not a table.
    #[error("the fixture file '{path}' must contain a table at the top level, found {found}")]
    NotATable { path: String, found: &'static str },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
