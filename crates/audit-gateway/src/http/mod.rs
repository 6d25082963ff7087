//! Platform REST adapter

mod platform_client;
mod rest_client;

pub use platform_client::PlatformClient;
pub use rest_client::{AuditLogEntryPayload, AuditLogPayload, RestClient, RestConfig};
