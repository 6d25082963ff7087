//! Gateway events
//!
//! Dispatch event names and the wire shapes of their payloads.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    ChannelPayload, GuildCreateEvent, GuildDeleteEvent, GuildMemberRemoveEvent,
    GuildMemberUpdateEvent, GuildRoleDeleteEvent, GuildRoleEvent, MemberPayload,
    MessageCreateEvent, MessageDeleteEvent, MessageUpdateEvent, ReadyEvent, RolePayload,
    UnavailableGuild, UserPayload, VoiceStatePayload,
};
