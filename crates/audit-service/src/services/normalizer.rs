//! Event normalizer
//!
//! One fixed mapping per event kind from a raw gateway event to an audit
//! record. Pure: no I/O, and the record timestamp is the `now` passed in.

use audit_core::{
    AuditRecord, Channel, ChannelEvent, EventKind, MemberRolesChangedEvent, MemberSnapshot,
    MessageDeletedEvent, MessageEditedEvent, RawEvent, RecordColor, Snowflake, VoiceStateChange,
    NO_CONTENT, UNKNOWN_CHANNEL,
};
use chrono::{DateTime, Utc};

/// Author placeholder when the message author is unknown
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Role list placeholder for members with no visible roles
pub const NO_ROLES: &str = "No roles";

/// A normalized record and the channel the event happened in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub kind: EventKind,
    pub record: AuditRecord,
    /// Channel the event concerns; `None` when it has no channel
    pub origin: Option<Snowflake>,
}

/// How a member's voice channel changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTransition<'a> {
    Joined(&'a Channel),
    Left(&'a Channel),
    Moved { from: &'a Channel, to: &'a Channel },
}

impl<'a> VoiceTransition<'a> {
    /// Classify a voice state update; `None` when the channel did not change
    pub fn classify(change: &'a VoiceStateChange) -> Option<Self> {
        match (&change.old_channel, &change.new_channel) {
            (None, Some(to)) => Some(Self::Joined(to)),
            (Some(from), None) => Some(Self::Left(from)),
            (Some(from), Some(to)) if from.id != to.id => Some(Self::Moved { from, to }),
            _ => None,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Joined(_) => EventKind::VoiceJoined,
            Self::Left(_) => EventKind::VoiceLeft,
            Self::Moved { .. } => EventKind::VoiceMoved,
        }
    }
}

/// Event normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct EventNormalizer;

impl EventNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Build the record for an event, or `None` when nothing is worth recording
    pub fn normalize(&self, event: &RawEvent, now: DateTime<Utc>) -> Option<Normalized> {
        match event {
            RawEvent::MessageDeleted(e) => Some(message_deleted(e, now)),
            RawEvent::MessageEdited(e) => Some(message_edited(e, now)),
            RawEvent::MemberRolesChanged(e) => member_roles_changed(e, now),
            RawEvent::ChannelCreated(e) => Some(channel_lifecycle(e, EventKind::ChannelCreated, now)),
            RawEvent::ChannelDeleted(e) => Some(channel_lifecycle(e, EventKind::ChannelDeleted, now)),
            RawEvent::VoiceStateChanged(e) => voice_state(e, now),
        }
    }
}

fn author_value(author: Option<Snowflake>) -> String {
    author.map_or_else(|| UNKNOWN_AUTHOR.to_string(), |id| id.user_mention())
}

fn channel_value(channel: Option<&Channel>) -> &str {
    channel.map_or(UNKNOWN_CHANNEL, Channel::display_name)
}

fn content_value(content: Option<&str>) -> &str {
    content.unwrap_or(NO_CONTENT)
}

fn roles_value(member: &MemberSnapshot) -> String {
    let names = member.visible_role_names();
    if names.is_empty() {
        NO_ROLES.to_string()
    } else {
        names.join(", ")
    }
}

fn message_deleted(e: &MessageDeletedEvent, now: DateTime<Utc>) -> Normalized {
    let record = AuditRecord::new("Message Deleted", RecordColor::Red, now)
        .with_field("Author", author_value(e.message.author_id), true)
        .with_field("Channel", channel_value(e.channel.as_ref()), true)
        .with_field("Content", content_value(e.message.text()), false);

    Normalized {
        kind: EventKind::MessageDeleted,
        record,
        origin: Some(e.message.channel_id),
    }
}

fn message_edited(e: &MessageEditedEvent, now: DateTime<Utc>) -> Normalized {
    let record = AuditRecord::new("Message Edited", RecordColor::Yellow, now)
        .with_field("Author", author_value(e.old.author_id), true)
        .with_field("Channel", channel_value(e.channel.as_ref()), true)
        .with_field("Old Content", content_value(e.old.text()), false)
        .with_field("New Content", content_value(e.new.text()), false);

    Normalized {
        kind: EventKind::MessageEdited,
        record,
        origin: Some(e.old.channel_id),
    }
}

fn member_roles_changed(e: &MemberRolesChangedEvent, now: DateTime<Utc>) -> Option<Normalized> {
    // Count-only trigger: a same-size swap of roles is not recorded.
    if e.old.role_count() == e.new.role_count() {
        return None;
    }

    let record = AuditRecord::new("Member Roles Updated", RecordColor::Green, now)
        .with_field("Member", e.new.user_id.user_mention(), true)
        .with_field("Old Roles", roles_value(&e.old), true)
        .with_field("New Roles", roles_value(&e.new), true);

    Some(Normalized {
        kind: EventKind::MemberRolesChanged,
        record,
        origin: None,
    })
}

fn channel_lifecycle(e: &ChannelEvent, kind: EventKind, now: DateTime<Utc>) -> Normalized {
    let (title, color) = match kind {
        EventKind::ChannelCreated => ("Channel Created", RecordColor::Green),
        _ => ("Channel Deleted", RecordColor::Red),
    };
    let record = AuditRecord::new(title, color, now)
        .with_field("Channel Name", e.channel.display_name(), false)
        .with_field("Channel Type", e.channel.kind_label(), false);

    Normalized {
        kind,
        record,
        origin: Some(e.channel.id),
    }
}

fn voice_state(e: &VoiceStateChange, now: DateTime<Utc>) -> Option<Normalized> {
    let transition = VoiceTransition::classify(e)?;
    let user = e.user_id.user_mention();

    let (record, origin) = match transition {
        VoiceTransition::Joined(to) => (
            AuditRecord::new("Voice Channel Joined", RecordColor::Green, now)
                .with_field("User", user, true)
                .with_field("Channel", to.display_name(), true),
            to.id,
        ),
        VoiceTransition::Left(from) => (
            AuditRecord::new("Voice Channel Left", RecordColor::Red, now)
                .with_field("User", user, true)
                .with_field("Channel", from.display_name(), true),
            from.id,
        ),
        VoiceTransition::Moved { from, to } => (
            AuditRecord::new("Voice Channel Moved", RecordColor::Yellow, now)
                .with_field("User", user, true)
                .with_field("From Channel", from.display_name(), true)
                .with_field("To Channel", to.display_name(), true),
            to.id,
        ),
    };

    Some(Normalized {
        kind: transition.kind(),
        record,
        origin: Some(origin),
    })
}
