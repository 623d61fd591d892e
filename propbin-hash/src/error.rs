//! Error types for hash dictionary loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for hash operations.
pub type HashResult<T> = Result<T, HashError>;

/// Errors that can occur while loading hash dictionaries.
///
/// Resolving a hash never fails; only reading dictionary files can.
/// Malformed dictionary lines are skipped, not reported.
#[derive(Debug, Error)]
pub enum HashError {
    /// Dictionary file or directory could not be read.
    #[error("IO error{}: {}", .path.as_ref().map(|p| format!(" at '{}'", p.display())).unwrap_or_default(), .source)]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
}

impl HashError {
    /// Creates an IO error with file path context.
    pub fn io_with_path(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for HashError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}
