//! `Platform` implementation over REST plus the gateway state cache

use async_trait::async_trait;
use audit_core::{
    AuditLogAction, AuditLogEntry, AuditRecord, Channel, Message, Platform, PlatformResult,
    Snowflake,
};
use tracing::debug;

use super::rest_client::RestClient;
use crate::cache::SharedStateCache;

/// Platform adapter used by the audit pipeline
#[derive(Debug, Clone)]
pub struct PlatformClient {
    rest: RestClient,
    cache: SharedStateCache,
}

impl PlatformClient {
    pub fn new(rest: RestClient, cache: SharedStateCache) -> Self {
        Self { rest, cache }
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }
}

#[async_trait]
impl Platform for PlatformClient {
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Message> {
        let payload = self.rest.get_message(channel_id, message_id).await?;
        let mut message = payload.to_message();
        if message.guild_id.is_none() {
            message.guild_id = self.cache.channel(channel_id).and_then(|c| c.guild_id);
        }
        Ok(message)
    }

    /// Cache first; the REST lookup result is cached for later events
    async fn resolve_channel(&self, channel_id: Snowflake) -> PlatformResult<Option<Channel>> {
        if let Some(channel) = self.cache.channel(channel_id) {
            return Ok(Some(channel));
        }

        match self.rest.get_channel(channel_id).await {
            Ok(payload) => {
                let channel = payload.into_channel(None);
                self.cache.upsert_channel(channel.clone());
                debug!(channel_id = %channel_id, "Channel resolved over REST");
                Ok(Some(channel))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn recent_audit_entries(
        &self,
        guild_id: Snowflake,
        action: AuditLogAction,
        limit: u8,
    ) -> PlatformResult<Vec<AuditLogEntry>> {
        let payload = self.rest.audit_logs(guild_id, action, limit).await?;
        Ok(payload
            .audit_log_entries
            .into_iter()
            .map(AuditLogEntry::from)
            .collect())
    }

    async fn send_record(&self, channel_id: Snowflake, record: &AuditRecord) -> PlatformResult<()> {
        self.rest.post_record(channel_id, record).await
    }

    async fn send_text(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        self.rest.post_text(channel_id, content).await
    }
}
