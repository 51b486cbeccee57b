//! Storage errors.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure reported by a [`Storage`](super::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a stored value failed.
    #[error("failed to read {path}")]
    Read {
        /// File backing the key.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing a value failed; the previous value is left in place.
    #[error("failed to write {path}")]
    Write {
        /// File backing the key.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Removing a stored value failed.
    #[error("failed to remove {path}")]
    Remove {
        /// File backing the key.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The backend cannot serve requests.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
