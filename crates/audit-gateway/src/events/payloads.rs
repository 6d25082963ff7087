//! Event payload definitions
//!
//! Only the fields the logger reads are modeled; serde ignores the rest.
//! Payloads also serialize so the test platform can emit them.

use audit_core::{Channel, ChannelType, Message, Role, Snowflake};
use serde::{Deserialize, Serialize};

// === Connection Events ===

/// READY event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// The bot user
    pub user: UserPayload,
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,
    #[serde(default)]
    pub session_id: String,
}

/// Guild listed in READY before its GUILD_CREATE arrives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableGuild {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

// === User Payload ===

/// User data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl UserPayload {
    /// `name#discriminator`, or the bare name when there is none
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{d}", self.username),
            _ => self.username.clone(),
        }
    }
}

// === Guild Events ===

/// GUILD_CREATE event payload
///
/// Sent for each guild after READY and when the bot joins a guild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildCreateEvent {
    pub id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channels: Vec<ChannelPayload>,
    #[serde(default)]
    pub roles: Vec<RolePayload>,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
    #[serde(default)]
    pub voice_states: Vec<VoiceStatePayload>,
}

/// GUILD_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: Snowflake,
    /// Temporary outage rather than leaving the guild
    #[serde(default)]
    pub unavailable: bool,
}

// === Channel Events ===

/// Channel data; also the payload of CHANNEL_CREATE/UPDATE/DELETE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPayload {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub channel_type: i32,
}

impl ChannelPayload {
    /// Convert into a domain channel, filling the guild when the payload omits it
    pub fn into_channel(self, guild_id: Option<Snowflake>) -> Channel {
        Channel {
            id: self.id,
            guild_id: self.guild_id.or(guild_id),
            name: self.name,
            channel_type: ChannelType::from(self.channel_type),
        }
    }
}

// === Role Events ===

/// Role data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePayload {
    pub id: Snowflake,
    pub name: String,
}

impl RolePayload {
    pub fn into_role(self, guild_id: Snowflake) -> Role {
        Role::new(self.id, guild_id, self.name)
    }
}

/// GUILD_ROLE_CREATE/GUILD_ROLE_UPDATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRoleEvent {
    pub guild_id: Snowflake,
    pub role: RolePayload,
}

/// GUILD_ROLE_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRoleDeleteEvent {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

// === Message Events ===

/// MESSAGE_CREATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default)]
    pub content: String,
}

impl MessageCreateEvent {
    pub fn to_message(&self) -> Message {
        Message::new(
            self.id,
            self.channel_id,
            self.guild_id,
            self.author.id,
            self.content.clone(),
        )
    }
}

/// MESSAGE_UPDATE event payload
///
/// Only changed fields are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// MESSAGE_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeleteEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

// === Member Events ===

/// Guild member data; also the payload of GUILD_MEMBER_ADD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub user: UserPayload,
    /// Role ids, without the implicit @everyone role
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// GUILD_MEMBER_UPDATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberUpdateEvent {
    pub guild_id: Snowflake,
    pub user: UserPayload,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// GUILD_MEMBER_REMOVE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberRemoveEvent {
    pub guild_id: Snowflake,
    pub user: UserPayload,
}

// === Voice Events ===

/// A member's voice connection; also the payload of VOICE_STATE_UPDATE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceStatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    /// `None` when the member disconnected
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    pub user_id: Snowflake,
}
