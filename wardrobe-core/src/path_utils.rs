//! Cross-platform path utilities
//!
//! Record paths are reported with forward slashes on every platform so log
//! lines and error messages read the same on Windows.

use std::path::Path;

/// Normalize path to forward slashes
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a path to a normalized display string
#[inline]
pub fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// Whether the path's extension is one of `extensions` (case-insensitive, no dot)
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|candidate| {
        candidate
            .trim_start_matches('.')
            .eq_ignore_ascii_case(ext)
    })
}
