//! Error types raised by stores and snapshot codecs.

use std::{io, path::PathBuf};

use thiserror::Error;
use world_of_bits_world::RestoreError;

/// Errors surfaced by [`Store`](crate::Store) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key contains characters the backend cannot address.
    #[error("store key '{0}' is not supported")]
    InvalidKey(String),

    /// The backend failed to read or write its medium.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Location the backend attempted to access.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Errors raised while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage backend failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The payload could not be encoded or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed but described an impossible session.
    #[error("invalid snapshot: {0}")]
    Restore(#[from] RestoreError),
}
