//! Error types for kernel-resource

use std::path::PathBuf;

/// Result type for kernel-resource operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating or reading resources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {location} at line {line}: {message}")]
    Parse {
        location: String,
        line: usize,
        message: String,
    },

    #[error("Invalid resource name: {name:?}")]
    InvalidName { name: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
