//! Platform errors - failures of calls into the chat platform

use thiserror::Error;

/// Errors raised by a [`Platform`](crate::traits::Platform) implementation
#[derive(Debug, Error)]
pub enum PlatformError {
    // =========================================================================
    // Access Errors
    // =========================================================================
    #[error("Unknown {resource}: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Missing access: {0}")]
    Forbidden(String),

    #[error("Invalid or revoked credential")]
    Unauthorized,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Platform responded with HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode platform response: {0}")]
    Decode(String),
}

impl PlatformError {
    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "UNKNOWN_RESOURCE",
            Self::Forbidden(_) => "MISSING_ACCESS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
        }
    }

    /// Entity is gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Access was refused (permissions lost or bad credential)
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::Unauthorized)
    }
}
