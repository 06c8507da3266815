//! Snapshot I/O errors
//!
//! Every variant carries the path involved so the CLI can report it as-is.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Snapshot file does not exist
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File contents are not a valid snapshot
    #[error("Invalid snapshot format in '{path}': {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be encoded
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

impl SnapshotError {
    /// Classify an I/O error raised while reading `path`
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => SnapshotError::NotFound { path },
            io::ErrorKind::PermissionDenied => SnapshotError::PermissionDenied {
                path,
                source: error,
            },
            _ => SnapshotError::Read {
                path,
                source: error,
            },
        }
    }

    /// Classify an I/O error raised while writing `path`
    pub fn from_write(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => SnapshotError::PermissionDenied {
                path,
                source: error,
            },
            _ => SnapshotError::Write {
                path,
                source: error,
            },
        }
    }
}

/// Result type for snapshot I/O
pub type SnapshotResult<T> = Result<T, SnapshotError>;
