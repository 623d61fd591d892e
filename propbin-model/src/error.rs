//! Error types for the container model.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

fn at(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in '{}'", p.display()))
        .unwrap_or_default()
}

/// Errors that can occur reading, writing, or validating containers.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Container bytes are malformed.
    #[error("decode error{}: {}", at(.path), .message)]
    Decode {
        message: String,
        path: Option<PathBuf>,
    },

    /// Container could not be encoded.
    #[error("encode error{}: {}", at(.path), .message)]
    Encode {
        message: String,
        path: Option<PathBuf>,
    },

    /// Missing file, permission, or disk failure.
    #[error("IO error{}: {}", at(.path), .source)]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    /// A value does not have the shape its declared kind requires.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl ModelError {
    /// Creates a decode error without path context.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            path: None,
        }
    }

    /// Creates an IO error with file path context.
    pub fn io_with_path(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }

    /// Attaches `path` to an error that does not carry one yet.
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Decode { message, path: None } => Self::Decode {
                message,
                path: Some(path.into()),
            },
            Self::Encode { message, path: None } => Self::Encode {
                message,
                path: Some(path.into()),
            },
            Self::Io { source, path: None } => Self::Io {
                source,
                path: Some(path.into()),
            },
            other => other,
        }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}
