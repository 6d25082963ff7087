//! Port traits
//!
//! The service layer depends only on these traits. Infrastructure crates
//! provide the implementations (Redis/file stores, the REST + gateway
//! platform client), and tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::entities::{AuditLogAction, AuditLogEntry, Channel, Message};
use crate::error::{PlatformError, StoreError};
use crate::record::AuditRecord;
use crate::value_objects::Snowflake;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Key/Value Store
// ============================================================================

/// Durable string-to-string storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key was never written
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

// ============================================================================
// Platform
// ============================================================================

/// Capabilities of the chat platform used by the logger
#[async_trait]
pub trait Platform: Send + Sync {
    /// Fetch the current state of a message
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Message>;

    /// Resolve a channel by id; `Ok(None)` when it no longer exists
    async fn resolve_channel(&self, channel_id: Snowflake) -> PlatformResult<Option<Channel>>;

    /// Most recent audit trail entries of one action type, newest first
    async fn recent_audit_entries(
        &self,
        guild_id: Snowflake,
        action: AuditLogAction,
        limit: u8,
    ) -> PlatformResult<Vec<AuditLogEntry>>;

    /// Send a structured record to a channel
    async fn send_record(&self, channel_id: Snowflake, record: &AuditRecord) -> PlatformResult<()>;

    /// Send a plain text message to a channel
    async fn send_text(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()>;
}
