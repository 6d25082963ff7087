//! Message entity - a chat message as observed through the gateway
//!
//! Messages arriving with delete/update events may be *partial*: only the
//! ids are known until the message is fetched again.

use crate::value_objects::Snowflake;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author_id: Option<Snowflake>,
    pub content: Option<String>,
    /// Only ids are populated; needs a fetch before it can be described
    pub partial: bool,
}

impl Message {
    /// Create a fully-populated message
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        guild_id: Option<Snowflake>,
        author_id: Snowflake,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            guild_id,
            author_id: Some(author_id),
            content: Some(content.into()),
            partial: false,
        }
    }

    /// Create a partial message reference
    pub fn partial(id: Snowflake, channel_id: Snowflake, guild_id: Option<Snowflake>) -> Self {
        Self {
            id,
            channel_id,
            guild_id,
            author_id: None,
            content: None,
            partial: true,
        }
    }

    /// Content if present and non-empty
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }

    /// Apply an update payload; absent fields keep their current value
    pub fn patch(&mut self, content: Option<String>) {
        if let Some(content) = content {
            self.content = Some(content);
        }
    }
}
