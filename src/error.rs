//! Mimir error types

use std::path::PathBuf;

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Storage errors
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt cache entry {}: {source}", path.display())]
    CorruptEntry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid segment name: {0:?}")]
    InvalidSegment(String),

    // Collaborator errors
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("no embedding provider configured")]
    NoProvider,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MimirError {
    /// Wrap an I/O error together with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MimirError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
