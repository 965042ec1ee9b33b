//! Error types for buffer I/O.
//!
//! Cursor movement and edits never fail: hitting a line or buffer boundary
//! clamps or becomes a no-op. Only loading and saving report errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by buffer file operations.
#[derive(Debug, Error)]
pub enum BufferError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The file content is not valid UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    InvalidUtf8 {
        /// File that failed to decode.
        path: PathBuf,
    },

    /// A memory buffer has no file to save to.
    #[error("buffer {name:?} has no backing file")]
    NoBackingFile {
        /// Name of the buffer.
        name: String,
    },
}

impl BufferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
