//! Store errors - failures of the key/value persistence backend

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::traits::KeyValueStore)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt value under {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    /// Create a backend error from any displayable cause
    pub fn backend(cause: impl std::fmt::Display) -> Self {
        Self::Backend(cause.to_string())
    }
}
