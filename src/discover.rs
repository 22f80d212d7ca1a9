//! Fixture file discovery.

use crate::{GoldenError, GoldenResult};
use std::fs;
use std::path::{Path, PathBuf};

/// All files under `dir` with `extension`, recursively, as `(id, path)` pairs.
///
/// The id is the path relative to `dir` with `/` separators. Results are
/// sorted by id so test order is stable.
pub fn fixture_files(dir: &Path, extension: &str) -> GoldenResult<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    collect(dir, dir, extension, &mut files)?;
    files.sort();
    Ok(files)
}

/// Files matching the glob `pattern` under `base`, as `(id, path)` pairs.
///
/// `pattern` is relative to `base`, e.g. `find_words/*.toml` or
/// `**/*.toml`. Ids are relative to `base` as in [`fixture_files`].
pub fn fixture_glob(base: &Path, pattern: &str) -> GoldenResult<Vec<(String, PathBuf)>> {
    let base_str = base.to_str().ok_or_else(|| {
        GoldenError::Usage(format!("fixture directory {} is not UTF-8", base.display()))
    })?;
    let full = format!("{}/{}", glob::Pattern::escape(base_str), pattern);
    let entries = glob::glob(&full).map_err(|e| {
        GoldenError::Usage(format!("invalid fixture pattern '{}': {}", pattern, e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GoldenError::Io {
            path: e.path().display().to_string(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push((relative_id(base, &path), path));
        }
    }
    files.sort();
    Ok(files)
}

fn relative_id(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn collect(
    base: &Path,
    dir: &Path,
    extension: &str,
    files: &mut Vec<(String, PathBuf)>,
) -> GoldenResult<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let io_err = |e| GoldenError::Io {
        path: dir.display().to_string(),
        source: e,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();

        if path.is_dir() {
            collect(base, &path, extension, files)?;
        } else if path.extension().map_or(false, |e| e == extension) {
            files.push((relative_id(base, &path), path));
        }
    }

    Ok(())
}
