use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Filesystem errors
    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to move {source_path} to {destination}: {reason}")]
    MoveFailed {
        source_path: PathBuf,
        destination: PathBuf,
        reason: String,
    },

    // Date resolution errors
    #[error("No capture date could be resolved for {0}")]
    UnresolvedDate(PathBuf),

    #[error("Failed to parse sidecar {path}: {reason}")]
    SidecarParse { path: PathBuf, reason: String },

    // External tool errors
    #[error("exiftool exited with status {status}: {stderr}")]
    ToolInvocation { status: i32, stderr: String },

    #[error("exiftool timed out after {timeout:?} on {path}")]
    ToolTimeout { path: PathBuf, timeout: Duration },
}

/// Result type for phototriage operations.
pub type Result<T> = std::result::Result<T, TriageError>;
