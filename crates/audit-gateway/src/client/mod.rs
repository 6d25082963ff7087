//! Gateway client
//!
//! Holds one session at a time. Resumable endings open a fresh session
//! after the configured delay; fatal ones are returned to the caller.

mod gateway_client;
mod heartbeat;
mod session;

pub use gateway_client::{GatewayClient, GatewayConfig};
pub use session::SessionState;
