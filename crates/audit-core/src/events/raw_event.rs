//! Raw gateway events
//!
//! Message payloads may be partial (see [`Message::partial`]). Member and
//! voice events carry both the old and the new snapshot so that the
//! normalizer can decide whether anything worth recording happened.

use std::fmt;

use crate::entities::{Channel, MemberSnapshot, Message};
use crate::value_objects::Snowflake;

/// All events the logger can receive from the gateway
#[derive(Debug, Clone)]
pub enum RawEvent {
    MessageDeleted(MessageDeletedEvent),
    MessageEdited(MessageEditedEvent),
    MemberRolesChanged(MemberRolesChangedEvent),
    ChannelCreated(ChannelEvent),
    ChannelDeleted(ChannelEvent),
    /// Voice join, leave, and move all arrive as one state update
    VoiceStateChanged(VoiceStateChange),
}

/// A message was deleted
#[derive(Debug, Clone)]
pub struct MessageDeletedEvent {
    pub guild_id: Snowflake,
    pub message: Message,
    /// Channel the message lived in, if known
    pub channel: Option<Channel>,
}

/// A message was edited
#[derive(Debug, Clone)]
pub struct MessageEditedEvent {
    pub guild_id: Snowflake,
    pub old: Message,
    pub new: Message,
    pub channel: Option<Channel>,
}

/// A member update with before/after role sets
#[derive(Debug, Clone)]
pub struct MemberRolesChangedEvent {
    pub guild_id: Snowflake,
    pub old: MemberSnapshot,
    pub new: MemberSnapshot,
}

/// A channel was created or deleted
#[derive(Debug, Clone)]
pub struct ChannelEvent {
    pub guild_id: Snowflake,
    pub channel: Channel,
}

/// A member's voice channel before and after a state update
#[derive(Debug, Clone)]
pub struct VoiceStateChange {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub old_channel: Option<Channel>,
    pub new_channel: Option<Channel>,
}

impl RawEvent {
    /// Guild the event belongs to
    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::MessageDeleted(e) => e.guild_id,
            Self::MessageEdited(e) => e.guild_id,
            Self::MemberRolesChanged(e) => e.guild_id,
            Self::ChannelCreated(e) | Self::ChannelDeleted(e) => e.guild_id,
            Self::VoiceStateChanged(e) => e.guild_id,
        }
    }

    /// Short name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageDeleted(_) => "MESSAGE_DELETED",
            Self::MessageEdited(_) => "MESSAGE_EDITED",
            Self::MemberRolesChanged(_) => "MEMBER_ROLES_CHANGED",
            Self::ChannelCreated(_) => "CHANNEL_CREATED",
            Self::ChannelDeleted(_) => "CHANNEL_DELETED",
            Self::VoiceStateChanged(_) => "VOICE_STATE_CHANGED",
        }
    }
}

/// Kinds of audit records the logger produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MessageDeleted,
    MessageEdited,
    MemberRolesChanged,
    ChannelCreated,
    ChannelDeleted,
    VoiceJoined,
    VoiceLeft,
    VoiceMoved,
}

impl EventKind {
    /// Get the string representation of the kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MessageDeleted => "MESSAGE_DELETED",
            Self::MessageEdited => "MESSAGE_EDITED",
            Self::MemberRolesChanged => "MEMBER_ROLES_CHANGED",
            Self::ChannelCreated => "CHANNEL_CREATED",
            Self::ChannelDeleted => "CHANNEL_DELETED",
            Self::VoiceJoined => "VOICE_JOINED",
            Self::VoiceLeft => "VOICE_LEFT",
            Self::VoiceMoved => "VOICE_MOVED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
