//! Format-preserving view of a fixture file.
//!
//! A [`FixtureDocument`] holds the same file content twice: as a plain
//! [`toml::Table`] used to compare values, and as a [`toml_edit::DocumentMut`]
//! that keeps comments, key order and whitespace intact when values change.

use crate::plain::parse_table;
use crate::{StoreError, StoreResult};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, Value};

/// An editable fixture file.
pub struct FixtureDocument {
    path: PathBuf,
    plain: toml::Table,
    doc: DocumentMut,
}

impl FixtureDocument {
    /// Read the current on-disk content of `path`.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Build a document from `content`; `path` is where [`persist`](Self::persist) writes.
    pub fn parse(path: &Path, content: &str) -> StoreResult<Self> {
        let plain = parse_table(path, content)?;
        let doc = content.parse::<DocumentMut>().map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            plain,
            doc,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current value of a top-level key.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.plain.get(key)
    }

    /// Top-level keys in file order.
    pub fn keys(&self) -> Vec<String> {
        self.doc.iter().map(|(key, _)| key.to_string()).collect()
    }

    /// Set a top-level key, returning whether the document changed.
    ///
    /// A key that already holds an equal value is left untouched. An
    /// overwritten value keeps its surrounding whitespace and trailing comment,
    /// and keeps inline style if it was inline.
    pub fn set(&mut self, key: &str, value: &toml::Value) -> bool {
        if self.plain.get(key) == Some(value) {
            return false;
        }

        match self.doc.get_mut(key) {
            Some(Item::Value(existing)) => {
                let decor = existing.decor().clone();
                *existing = to_value(value);
                *existing.decor_mut() = decor;
            }
            Some(_) => {
                // A `[table]` header's key decor does not suit `key = value`.
                self.doc.remove(key);
                self.doc.insert(key, to_item(value));
            }
            None => {
                self.doc.insert(key, to_item(value));
            }
        }
        self.plain.insert(key.to_string(), value.clone());
        true
    }

    /// Remove a top-level key, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.plain.remove(key);
        self.doc.remove(key).is_some()
    }

    /// Serialize the document.
    pub fn render(&self) -> String {
        self.doc.to_string()
    }

    /// Write the document back to its path.
    ///
    /// The content goes to a temporary file in the same directory which then
    /// replaces the original, so readers never observe a partial file.
    pub fn persist(&self) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(self.render().as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| StoreError::io(&self.path, e))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        tracing::debug!(path = %self.path.display(), "persisted fixture");
        Ok(())
    }
}

impl fmt::Debug for FixtureDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureDocument")
            .field("path", &self.path)
            .field("keys", &self.keys())
            .finish()
    }
}

/// Render a multi-line string as a TOML literal block (`'''`).
///
/// Returns `None` for single-line strings and for content a literal block
/// cannot hold verbatim (embedded `'''`, a trailing quote, control characters).
pub fn multiline_literal(text: &str) -> Option<Value> {
    if !text.contains('\n') || text.contains("'''") || text.ends_with('\'') {
        return None;
    }
    if text
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\t')
    {
        return None;
    }

    let mut value = format!("'''\n{}'''", text).parse::<Value>().ok()?;
    value.decor_mut().clear();
    Some(value)
}

fn to_item(value: &toml::Value) -> Item {
    match value {
        toml::Value::Table(entries) => {
            let mut table = Table::new();
            for (key, entry) in entries {
                table.insert(key, Item::Value(to_value(entry)));
            }
            Item::Table(table)
        }
        other => Item::Value(to_value(other)),
    }
}

fn to_value(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(text) => {
            multiline_literal(text).unwrap_or_else(|| Value::from(text.as_str()))
        }
        toml::Value::Integer(n) => Value::from(*n),
        toml::Value::Float(x) => Value::from(*x),
        toml::Value::Boolean(b) => Value::from(*b),
        toml::Value::Datetime(dt) => Value::from(*dt),
        toml::Value::Array(items) => {
            let mut array = Array::new();
            for item in items {
                array.push(to_value(item));
            }
            Value::Array(array)
        }
        toml::Value::Table(entries) => {
            let mut table = InlineTable::new();
            for (key, entry) in entries {
                table.insert(key.as_str(), to_value(entry));
            }
            Value::InlineTable(table)
        }
    }
}
