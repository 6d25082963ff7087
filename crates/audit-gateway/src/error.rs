//! Gateway client error types

use audit_common::AppError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::protocol::{CloseCode, CloseDisposition};

/// Gateway client error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level WebSocket failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// A frame could not be decoded
    #[error("Invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server broke the handshake or sent something unexpected
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The token was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server invalidated the session before it became ready
    #[error("Session invalidated before READY")]
    InvalidSession,

    /// The server closed the connection
    #[error("Connection closed ({code:?}): {reason}")]
    Closed { code: Option<u16>, reason: String },

    /// No heartbeat ACK arrived between two heartbeats
    #[error("Heartbeat not acknowledged")]
    HeartbeatTimeout,
}

impl GatewayError {
    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Error for a server close frame
    pub fn closed(code: Option<u16>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if code == Some(CloseCode::AuthenticationFailed.as_u16()) {
            return Self::AuthenticationFailed(reason);
        }
        Self::Closed { code, reason }
    }

    /// Whether retrying with a fresh session cannot help
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::AuthenticationFailed(_) | Self::InvalidSession => true,
            Self::Closed { code: Some(code), .. } => {
                CloseCode::disposition_of(*code) == CloseDisposition::Fatal
            }
            _ => false,
        }
    }
}

/// Gateway client result type
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::AuthenticationFailed(reason) => Self::InvalidCredential(reason),
            other => Self::gateway(other),
        }
    }
}
