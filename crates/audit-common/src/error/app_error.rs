//! Application error types
//!
//! Errors that can stop the process. Everything that happens while
//! handling a single gateway event is contained in the service layer and
//! never reaches this type.

use audit_core::{PlatformError, StoreError};
use std::fmt;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Startup errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    // Collaborator errors
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Store(#[from] StoreError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get error code for diagnostics
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidCredential(_) => "INVALID_CREDENTIAL",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Platform(e) => e.code(),
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the process must not start serving events
    #[must_use]
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::InvalidCredential(_) | Self::Platform(PlatformError::Unauthorized)
        )
    }

    /// Create a gateway error
    #[must_use]
    pub fn gateway(msg: impl fmt::Display) -> Self {
        Self::Gateway(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
