//! Error types for email decomposition

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a decomposition call
#[derive(Error, Debug)]
pub enum DecomposeError {
    /// Failed to parse the email structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Failed to decode part content
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Filesystem failure outside of the best-effort cleanup
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Corrupt or unreadable zip attachment
    #[error("Invalid archive {}: {details}", .archive.display())]
    Archive { archive: PathBuf, details: String },

    /// Failed to render metadata as JSON
    #[error("Failed to serialize metadata: {0}")]
    Serialize(String),
}

impl DecomposeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for decomposition operations
pub type Result<T> = std::result::Result<T, DecomposeError>;
