//! Error types for gate-session

use std::path::{Path, PathBuf};

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by session stores
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure at a specific path
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Session record could not be serialized or parsed
    #[error("Session record error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session identifier is empty or contains characters a store cannot key on
    #[error("Invalid session id: {id:?}")]
    InvalidSessionId { id: String },

    /// Advisory lock on a session record could not be acquired
    #[error("Failed to lock session record at {path}")]
    LockFailed { path: PathBuf },

    /// Failure reported by a store backend
    #[error("Session store unavailable: {message}")]
    Backend { message: String },
}

impl Error {
    /// Wrap an I/O error with the path it occurred at
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a backend error with the given message
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
