//! Dispatch to raw event translation
//!
//! Runs synchronously on the read loop so that each "before" snapshot
//! reflects exactly the events received earlier on the connection.

use audit_core::{
    Channel, ChannelEvent, MemberRolesChangedEvent, Message, MessageDeletedEvent,
    MessageEditedEvent, RawEvent, Snowflake, VoiceStateChange,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::cache::SharedStateCache;
use crate::error::GatewayResult;
use crate::events::{
    ChannelPayload, GatewayEventType, GuildCreateEvent, GuildDeleteEvent, GuildMemberRemoveEvent,
    GuildMemberUpdateEvent, GuildRoleDeleteEvent, GuildRoleEvent, MemberPayload,
    MessageCreateEvent, MessageDeleteEvent, MessageUpdateEvent, ReadyEvent, VoiceStatePayload,
};

/// What a dispatch turned into
#[derive(Debug, Clone)]
pub enum Routed {
    /// Session is ready
    Ready { user_tag: String },
    /// A loggable event for the pipeline
    Event(RawEvent),
    /// A guild message that may be a command
    Message {
        guild_id: Snowflake,
        channel_id: Snowflake,
        content: String,
    },
    /// Cache-only or ignored dispatch
    Nothing,
}

/// Dispatch translator
#[derive(Debug, Clone)]
pub struct Translator {
    cache: SharedStateCache,
}

fn decode<T: DeserializeOwned>(data: Value) -> GatewayResult<T> {
    Ok(serde_json::from_value(data)?)
}

impl Translator {
    pub fn new(cache: SharedStateCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SharedStateCache {
        &self.cache
    }

    /// Apply one dispatch to the cache and route it
    pub fn translate(&self, event_type: &str, data: Value) -> GatewayResult<Routed> {
        let Some(event) = GatewayEventType::from_str(event_type) else {
            trace!(event_type, "Ignoring dispatch");
            return Ok(Routed::Nothing);
        };

        let routed = match event {
            GatewayEventType::Ready => self.ready(decode(data)?),
            GatewayEventType::GuildCreate => {
                let guild: GuildCreateEvent = decode(data)?;
                self.cache.insert_guild(&guild);
                debug!(guild_id = %guild.id, channels = guild.channels.len(), "Guild cached");
                Routed::Nothing
            }
            GatewayEventType::GuildDelete => {
                let guild: GuildDeleteEvent = decode(data)?;
                if !guild.unavailable {
                    self.cache.remove_guild(guild.id);
                }
                Routed::Nothing
            }
            GatewayEventType::ChannelCreate => self.channel_created(decode(data)?),
            GatewayEventType::ChannelUpdate => {
                let payload: ChannelPayload = decode(data)?;
                self.cache.upsert_channel(payload.into_channel(None));
                Routed::Nothing
            }
            GatewayEventType::ChannelDelete => self.channel_deleted(decode(data)?),
            GatewayEventType::GuildRoleCreate | GatewayEventType::GuildRoleUpdate => {
                let event: GuildRoleEvent = decode(data)?;
                self.cache.upsert_role(event.role.into_role(event.guild_id));
                Routed::Nothing
            }
            GatewayEventType::GuildRoleDelete => {
                let event: GuildRoleDeleteEvent = decode(data)?;
                self.cache.remove_role(event.role_id);
                Routed::Nothing
            }
            GatewayEventType::MessageCreate => self.message_created(decode(data)?),
            GatewayEventType::MessageUpdate => self.message_updated(decode(data)?),
            GatewayEventType::MessageDelete => self.message_deleted(decode(data)?),
            GatewayEventType::GuildMemberAdd => {
                let member: MemberPayload = decode(data)?;
                if let Some(guild_id) = member.guild_id {
                    self.cache.update_member(guild_id, member.user.id, member.roles);
                }
                Routed::Nothing
            }
            GatewayEventType::GuildMemberUpdate => self.member_updated(decode(data)?),
            GatewayEventType::GuildMemberRemove => {
                let event: GuildMemberRemoveEvent = decode(data)?;
                self.cache.remove_member(event.guild_id, event.user.id);
                Routed::Nothing
            }
            GatewayEventType::VoiceStateUpdate => self.voice_state_updated(decode(data)?),
        };

        Ok(routed)
    }

    fn ready(&self, ready: ReadyEvent) -> Routed {
        Routed::Ready {
            user_tag: ready.user.tag(),
        }
    }

    fn channel_created(&self, payload: ChannelPayload) -> Routed {
        let channel = payload.into_channel(None);
        self.cache.upsert_channel(channel.clone());
        match channel.guild_id {
            Some(guild_id) => Routed::Event(RawEvent::ChannelCreated(ChannelEvent { guild_id, channel })),
            None => Routed::Nothing,
        }
    }

    fn channel_deleted(&self, payload: ChannelPayload) -> Routed {
        let cached = self.cache.remove_channel(payload.id);
        let mut channel = payload.into_channel(cached.as_ref().and_then(|c| c.guild_id));
        if channel.name.is_none() {
            channel.name = cached.and_then(|c| c.name);
        }
        match channel.guild_id {
            Some(guild_id) => Routed::Event(RawEvent::ChannelDeleted(ChannelEvent { guild_id, channel })),
            None => Routed::Nothing,
        }
    }

    fn message_created(&self, payload: MessageCreateEvent) -> Routed {
        let Some(guild_id) = payload.guild_id else {
            return Routed::Nothing;
        };
        self.cache.insert_message(payload.to_message());
        Routed::Message {
            guild_id,
            channel_id: payload.channel_id,
            content: payload.content,
        }
    }

    fn message_updated(&self, payload: MessageUpdateEvent) -> Routed {
        let Some(guild_id) = payload.guild_id else {
            return Routed::Nothing;
        };

        let old = self
            .cache
            .edit_message(payload.channel_id, payload.id, payload.content.clone())
            .unwrap_or_else(|| Message::partial(payload.id, payload.channel_id, Some(guild_id)));

        let mut new = old.clone();
        new.patch(payload.content);
        if let Some(author) = payload.author {
            new.author_id = Some(author.id);
        }

        Routed::Event(RawEvent::MessageEdited(MessageEditedEvent {
            guild_id,
            old,
            new,
            channel: self.cache.channel(payload.channel_id),
        }))
    }

    fn message_deleted(&self, payload: MessageDeleteEvent) -> Routed {
        let Some(guild_id) = payload.guild_id else {
            return Routed::Nothing;
        };

        let message = self
            .cache
            .remove_message(payload.channel_id, payload.id)
            .unwrap_or_else(|| Message::partial(payload.id, payload.channel_id, Some(guild_id)));

        Routed::Event(RawEvent::MessageDeleted(MessageDeletedEvent {
            guild_id,
            message,
            channel: self.cache.channel(payload.channel_id),
        }))
    }

    fn member_updated(&self, payload: GuildMemberUpdateEvent) -> Routed {
        let guild_id = payload.guild_id;
        let user_id = payload.user.id;
        let new = self.cache.snapshot(guild_id, user_id, &payload.roles);

        // Without a previous snapshot there is nothing to compare against.
        let Some(old) = self.cache.update_member(guild_id, user_id, payload.roles) else {
            debug!(guild_id = %guild_id, user_id = %user_id, "First sight of member, cached");
            return Routed::Nothing;
        };

        Routed::Event(RawEvent::MemberRolesChanged(MemberRolesChangedEvent { guild_id, old, new }))
    }

    fn voice_state_updated(&self, payload: VoiceStatePayload) -> Routed {
        let Some(guild_id) = payload.guild_id else {
            return Routed::Nothing;
        };

        let previous = self.cache.update_voice(guild_id, payload.user_id, payload.channel_id);
        if previous == payload.channel_id {
            // Mute, deafen, and similar updates
            return Routed::Nothing;
        }

        let lookup = |id: Snowflake| {
            self.cache
                .channel(id)
                .unwrap_or_else(|| Channel::unresolved(id, Some(guild_id)))
        };

        Routed::Event(RawEvent::VoiceStateChanged(VoiceStateChange {
            guild_id,
            user_id: payload.user_id,
            old_channel: previous.map(lookup),
            new_channel: payload.channel_id.map(lookup),
        }))
    }
}
