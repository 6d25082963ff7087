//! Gateway intents - which event groups the session subscribes to

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Event groups requested in Identify
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GatewayIntents: u64 {
        /// Guild, channel, and role lifecycle
        const GUILDS = 1 << 0;
        /// Member add, update, remove
        const GUILD_MEMBERS = 1 << 1;
        const GUILD_VOICE_STATES = 1 << 7;
        /// Message create, update, delete in guilds
        const GUILD_MESSAGES = 1 << 9;
        /// Message bodies are included in message events
        const MESSAGE_CONTENT = 1 << 15;
    }
}

impl GatewayIntents {
    /// Everything the audit logger listens to
    #[must_use]
    pub const fn audit_logger() -> Self {
        Self::GUILDS
            .union(Self::GUILD_MEMBERS)
            .union(Self::GUILD_VOICE_STATES)
            .union(Self::GUILD_MESSAGES)
            .union(Self::MESSAGE_CONTENT)
    }
}

impl Default for GatewayIntents {
    fn default() -> Self {
        Self::audit_logger()
    }
}

impl Serialize for GatewayIntents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for GatewayIntents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_bits_truncate(u64::deserialize(deserializer)?))
    }
}
