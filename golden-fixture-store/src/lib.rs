//! Plain and format-preserving views of golden fixture files.
//!
//! Fixture files are TOML documents with a table at the top level. They are
//! read two ways:
//!
//! - [`load_table`] - an immutable [`toml::Table`] for reading inputs
//! - [`FixtureDocument`] - an editable document that keeps comments, key
//!   order and whitespace, and writes multi-line strings as `'''` blocks
//!
//! ## Example
//!
//! ```
//! use golden_fixture_store::FixtureDocument;
//! use std::path::Path;
//!
//! let mut doc = FixtureDocument::parse(Path::new("golden.toml"), "# input\nn = 3\n").unwrap();
//! doc.set("doubled", &toml::Value::Integer(6));
//! assert_eq!(doc.render(), "# input\nn = 3\ndoubled = 6\n");
//! ```

mod document;
mod errors;
mod plain;

pub use document::{multiline_literal, FixtureDocument};
pub use errors::{StoreError, StoreResult};
pub use plain::{load_table, parse_table};
