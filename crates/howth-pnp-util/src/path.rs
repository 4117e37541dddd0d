//! Path helpers shared by the adapter.

use std::ffi::OsString;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Append a trailing separator to a directory path.
///
/// Locator lookups key on file-like paths, so a directory used as a synthetic
/// importer must end in a separator to be treated as "a file inside `dir`".
/// Paths that already end in a separator are returned unchanged.
#[must_use]
pub fn with_trailing_separator(dir: &Path) -> PathBuf {
    let raw = dir.as_os_str();
    if raw.is_empty() {
        return PathBuf::from(MAIN_SEPARATOR.to_string());
    }
    if has_trailing_separator(dir) {
        return dir.to_path_buf();
    }

    let mut out = OsString::with_capacity(raw.len() + 1);
    out.push(raw);
    out.push(MAIN_SEPARATOR.to_string());
    PathBuf::from(out)
}

/// Whether the path's textual form ends with a separator.
#[must_use]
pub fn has_trailing_separator(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.ends_with('/') || (cfg!(windows) && text.ends_with('\\'))
}

/// Returns `None` for an empty path, `Some(path)` otherwise.
///
/// Hosts report entry points with an empty importer; this folds that case
/// into "no importer".
#[must_use]
pub fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
