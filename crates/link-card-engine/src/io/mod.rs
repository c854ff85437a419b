use std::fs;
use std::path::{Path, PathBuf};

use crate::card::{DecodedBlock, decode_document};

/// Glob used when no pattern is configured.
pub const DEFAULT_PATTERN: &str = "**/*.md";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
    #[error("Invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Read a markdown file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Read a file and decode every card block in it
pub fn decode_file(path: &Path) -> Result<Vec<DecodedBlock>, IoError> {
    let content = read_file(path)?;
    Ok(decode_document(&content))
}

/// Find files under `notes_root` matching a glob `pattern` such as `**/*.md`
pub fn scan_markdown_files(notes_root: &Path, pattern: &str) -> Result<Vec<PathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let root = glob::Pattern::escape(&notes_root.to_string_lossy());
    let full_pattern = format!("{root}/{pattern}");
    let entries = glob::glob(&full_pattern).map_err(|source| IoError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IoError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(format!(
            "notes directory not found: {}",
            path.display()
        )));
    }

    Ok(())
}
