//! Shared helpers for unit tests.

use std::path::PathBuf;

use tempfile::TempDir;

pub fn create_test_notes_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Write `content` to `relative` inside the notes dir, creating parents.
pub fn create_test_file(notes_dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = notes_dir.path().join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}
