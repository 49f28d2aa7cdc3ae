//! Error types for the funcprof library.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table parsing error: {0}")]
    Parse(#[from] csv::Error),

    #[error("line {line} has {found} columns, column index {needed} is required")]
    TooFewColumns {
        line: u64,
        needed: usize,
        found: usize,
    },

    #[error("manifest '{0}' lists no samples")]
    EmptyManifest(PathBuf),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
