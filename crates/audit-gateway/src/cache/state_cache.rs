//! State cache built from gateway events
//!
//! Mutated only by the gateway read loop, in event order. Spawned handlers
//! get owned snapshots and never read the cache directly except through
//! [`PlatformClient`](crate::http::PlatformClient) channel lookups.

use std::collections::VecDeque;
use std::sync::Arc;

use audit_core::{Channel, MemberSnapshot, Message, Role, Snowflake};
use dashmap::DashMap;

use crate::events::GuildCreateEvent;

/// Gateway state cache
#[derive(Debug)]
pub struct StateCache {
    /// Messages remembered per channel
    message_capacity: usize,

    channels: DashMap<Snowflake, Channel>,

    /// Roles by role id
    roles: DashMap<Snowflake, Role>,

    /// Role ids per (guild, user)
    members: DashMap<(Snowflake, Snowflake), Vec<Snowflake>>,

    /// Voice channel per (guild, user)
    voice: DashMap<(Snowflake, Snowflake), Snowflake>,

    /// Most recent messages per channel, oldest first
    messages: DashMap<Snowflake, VecDeque<Message>>,
}

/// Shared cache type
pub type SharedStateCache = Arc<StateCache>;

impl StateCache {
    /// Create an empty cache keeping up to `message_capacity` messages per channel
    pub fn new(message_capacity: usize) -> Self {
        Self {
            message_capacity,
            channels: DashMap::new(),
            roles: DashMap::new(),
            members: DashMap::new(),
            voice: DashMap::new(),
            messages: DashMap::new(),
        }
    }

    /// Create a shared cache
    pub fn new_shared(message_capacity: usize) -> SharedStateCache {
        Arc::new(Self::new(message_capacity))
    }

    // === Guilds ===

    /// Load a guild's full state
    pub fn insert_guild(&self, guild: &GuildCreateEvent) {
        let guild_id = guild.id;

        for channel in &guild.channels {
            let channel = channel.clone().into_channel(Some(guild_id));
            self.channels.insert(channel.id, channel);
        }
        for role in &guild.roles {
            self.roles.insert(role.id, role.clone().into_role(guild_id));
        }
        for member in &guild.members {
            self.members
                .insert((guild_id, member.user.id), member.roles.clone());
        }
        for state in &guild.voice_states {
            if let Some(channel_id) = state.channel_id {
                self.voice.insert((guild_id, state.user_id), channel_id);
            }
        }
    }

    /// Forget everything belonging to a guild
    pub fn remove_guild(&self, guild_id: Snowflake) {
        let channel_ids: Vec<Snowflake> = self
            .channels
            .iter()
            .filter(|c| c.guild_id == Some(guild_id))
            .map(|c| c.id)
            .collect();
        for id in channel_ids {
            self.channels.remove(&id);
            self.messages.remove(&id);
        }
        self.roles.retain(|_, role| role.guild_id != guild_id);
        self.members.retain(|(g, _), _| *g != guild_id);
        self.voice.retain(|(g, _), _| *g != guild_id);
    }

    // === Channels ===

    pub fn channel(&self, id: Snowflake) -> Option<Channel> {
        self.channels.get(&id).map(|c| c.clone())
    }

    /// Insert or replace a channel, returning the previous version
    pub fn upsert_channel(&self, channel: Channel) -> Option<Channel> {
        self.channels.insert(channel.id, channel)
    }

    /// Remove a channel and its message history
    pub fn remove_channel(&self, id: Snowflake) -> Option<Channel> {
        self.messages.remove(&id);
        self.channels.remove(&id).map(|(_, c)| c)
    }

    // === Roles ===

    pub fn upsert_role(&self, role: Role) {
        self.roles.insert(role.id, role);
    }

    pub fn remove_role(&self, role_id: Snowflake) {
        self.roles.remove(&role_id);
    }

    // === Members ===

    /// Snapshot of a member's roles, `None` when the member was never seen
    pub fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<MemberSnapshot> {
        let role_ids = self.members.get(&(guild_id, user_id))?.clone();
        Some(self.snapshot(guild_id, user_id, &role_ids))
    }

    /// Build a snapshot from role ids, naming roles from the cache
    pub fn snapshot(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> MemberSnapshot {
        let roles = role_ids
            .iter()
            .map(|id| {
                self.roles
                    .get(id)
                    .map_or_else(|| Role::new(*id, guild_id, format!("<@&{id}>")), |r| r.clone())
            })
            .collect();
        MemberSnapshot::new(guild_id, user_id, roles)
    }

    /// Replace a member's roles, returning the previous snapshot
    pub fn update_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: Vec<Snowflake>,
    ) -> Option<MemberSnapshot> {
        let previous = self.members.insert((guild_id, user_id), role_ids)?;
        Some(self.snapshot(guild_id, user_id, &previous))
    }

    pub fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) {
        self.members.remove(&(guild_id, user_id));
        self.voice.remove(&(guild_id, user_id));
    }

    // === Voice ===

    /// Record a member's voice channel, returning the previous one
    pub fn update_voice(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> Option<Snowflake> {
        let key = (guild_id, user_id);
        match channel_id {
            Some(id) => self.voice.insert(key, id),
            None => self.voice.remove(&key).map(|(_, id)| id),
        }
    }

    // === Messages ===

    /// Remember a message, evicting the oldest one in its channel when full
    pub fn insert_message(&self, message: Message) {
        if self.message_capacity == 0 {
            return;
        }
        let mut history = self.messages.entry(message.channel_id).or_default();
        if history.len() >= self.message_capacity {
            history.pop_front();
        }
        history.push_back(message);
    }

    /// Forget a message, returning it if it was cached
    pub fn remove_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        let mut history = self.messages.get_mut(&channel_id)?;
        let index = history.iter().position(|m| m.id == message_id)?;
        history.remove(index)
    }

    /// Apply an edit; returns the message as it was before, if cached
    pub fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        content: Option<String>,
    ) -> Option<Message> {
        let mut history = self.messages.get_mut(&channel_id)?;
        let cached = history.iter_mut().find(|m| m.id == message_id)?;
        let before = cached.clone();
        cached.patch(content);
        Some(before)
    }

    /// Number of cached messages in a channel
    pub fn message_count(&self, channel_id: Snowflake) -> usize {
        self.messages.get(&channel_id).map_or(0, |h| h.len())
    }
}
