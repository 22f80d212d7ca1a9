//! Plain (read-only) view of a fixture file.

use crate::{StoreError, StoreResult};
use std::fs;
use std::path::Path;

/// Load a fixture file as a plain table.
pub fn load_table(path: &Path) -> StoreResult<toml::Table> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    parse_table(path, &content)
}

/// Parse fixture content as a plain table.
///
/// `path` is only used for error messages.
pub fn parse_table(path: &Path, content: &str) -> StoreResult<toml::Table> {
    let value: toml::Value = toml::from_str(content).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    match value {
        toml::Value::Table(table) => Ok(table),
        other => Err(StoreError::NotATable {
            path: path.display().to_string(),
            found: other.type_str(),
        }),
    }
}
