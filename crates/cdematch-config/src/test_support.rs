//! Temporary file trees for unit tests.

use std::fs;

use tempfile::TempDir;

/// Writes each `(relative path, contents)` pair under a fresh temporary directory.
///
/// Parent directories are created as needed; a path ending in `/` creates only the
/// directory.
pub fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, contents) in files {
        let path = dir.path().join(rel);
        if rel.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
    }
    dir
}
