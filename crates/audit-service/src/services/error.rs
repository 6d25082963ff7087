//! Service layer error types

use audit_core::{PlatformError, StoreError};

/// Service layer error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Get the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Platform(e) => e.code(),
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
