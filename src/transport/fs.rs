use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::types::PathString;

/// Regular files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. An absent or unreadable directory
/// yields an empty list.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// Read a text file if it exists.
///
/// Returns `Ok(None)` when `path` is not a regular file; other failures
/// (permissions, invalid UTF-8) are returned to the caller.
pub fn read_text_if_present(path: &Path) -> io::Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path).map(Some)
}

/// `<root>/<concept>/<model>` directory used by every per-model content layout.
pub fn model_dir(root: &Path, concept: &str, model: &str) -> PathBuf {
    root.join(concept).join(model)
}

/// Lossy string form of a path for record traceability.
pub fn path_string(path: &Path) -> PathString {
    path.to_string_lossy().to_string()
}

/// File name component of a path, or the whole path when it has none.
pub fn file_name_string(path: &Path) -> PathString {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path_string(path))
}
