//! Error types for the wheel copier

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wheel copier operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wheel copier
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to copy {path}: {message}")]
    Copy { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
