//! Partial resolver
//!
//! Message events may reference messages the client never saw. Those
//! arrive as partial payloads and must be fetched before they can be
//! described. A failed fetch drops the event.

use audit_core::{
    Channel, Message, MessageDeletedEvent, MessageEditedEvent, RawEvent, Snowflake,
};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Partial resolver service
pub struct PartialResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PartialResolver<'a> {
    /// Create a new PartialResolver
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Upgrade any partial payload of an event
    ///
    /// Only message events are touched; every other kind passes through.
    #[instrument(skip_all, fields(event = event.name()))]
    pub async fn resolve(&self, event: RawEvent) -> ServiceResult<RawEvent> {
        match event {
            RawEvent::MessageDeleted(e) => self.resolve_deleted(e).await.map(RawEvent::MessageDeleted),
            RawEvent::MessageEdited(e) => self.resolve_edited(e).await.map(RawEvent::MessageEdited),
            other => Ok(other),
        }
    }

    /// Fetch the full message if only its ids are known
    pub async fn resolve_message(&self, message: Message) -> ServiceResult<Message> {
        if !message.partial {
            return Ok(message);
        }
        let fetched = self
            .ctx
            .platform()
            .fetch_message(message.channel_id, message.id)
            .await?;
        debug!(message_id = %message.id, "Partial message resolved");
        Ok(fetched)
    }

    async fn resolve_deleted(&self, mut event: MessageDeletedEvent) -> ServiceResult<MessageDeletedEvent> {
        event.message = self.resolve_message(event.message).await?;
        if event.channel.is_none() {
            event.channel = self.lookup_channel(event.message.channel_id).await;
        }
        Ok(event)
    }

    async fn resolve_edited(&self, mut event: MessageEditedEvent) -> ServiceResult<MessageEditedEvent> {
        event.old = self.resolve_message(event.old).await?;
        if event.new.partial {
            // The update only carried changed fields; fill the rest from the fetch.
            let content = event.new.content.take().or_else(|| event.old.content.clone());
            event.new = Message {
                content,
                partial: false,
                ..event.old.clone()
            };
        }
        if event.channel.is_none() {
            event.channel = self.lookup_channel(event.old.channel_id).await;
        }
        Ok(event)
    }

    /// Best effort; a missing channel only degrades the record
    async fn lookup_channel(&self, channel_id: Snowflake) -> Option<Channel> {
        match self.ctx.platform().resolve_channel(channel_id).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "Failed to resolve message channel");
                None
            }
        }
    }
}
