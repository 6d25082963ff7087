//! Channel entity - a guild text or voice channel

use crate::value_objects::Snowflake;

/// Fallback shown when a channel's name is not known
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Voice/text classification of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelType {
    /// Any non-voice channel
    #[default]
    GuildText,
    /// Guild voice channel (wire type 2)
    GuildVoice,
}

impl From<i32> for ChannelType {
    fn from(value: i32) -> Self {
        match value {
            2 => Self::GuildVoice,
            _ => Self::GuildText,
        }
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub channel_type: ChannelType,
}

impl Channel {
    /// Create a guild text channel
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: Some(name.into()),
            channel_type: ChannelType::GuildText,
        }
    }

    /// Create a guild voice channel
    #[must_use]
    pub fn new_voice(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: Some(name.into()),
            channel_type: ChannelType::GuildVoice,
        }
    }

    /// A channel known only by id
    #[must_use]
    pub fn unresolved(id: Snowflake, guild_id: Option<Snowflake>) -> Self {
        Self {
            id,
            guild_id,
            name: None,
            channel_type: ChannelType::GuildText,
        }
    }

    /// Check if this is a voice channel
    #[inline]
    #[must_use]
    pub fn is_voice(&self) -> bool {
        matches!(self.channel_type, ChannelType::GuildVoice)
    }

    /// Binary voice/text classification used in channel records
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        if self.is_voice() {
            "Voice Channel"
        } else {
            "Text Channel"
        }
    }

    /// Channel name, or [`UNKNOWN_CHANNEL`]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_CHANNEL)
    }
}
