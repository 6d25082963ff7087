//! Config store - guild to log channel bindings
//!
//! Bindings live in the key/value store under `logChannel_<guildId>`.
//! Writes report failure to the caller; reads never fail, a broken read is
//! the same as "no binding".

use audit_core::Snowflake;
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Namespace prefix of binding keys
pub const KEY_PREFIX: &str = "logChannel_";

/// Store key holding the log channel of a guild
pub fn binding_key(guild_id: Snowflake) -> String {
    format!("{KEY_PREFIX}{guild_id}")
}

/// Config store service
pub struct ConfigStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConfigStore<'a> {
    /// Create a new ConfigStore
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Bind a guild to a log channel, replacing any earlier binding
    #[instrument(skip(self))]
    pub async fn bind(&self, guild_id: Snowflake, channel_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .store()
            .set(&binding_key(guild_id), &channel_id.to_string())
            .await?;
        debug!("Log channel binding stored");
        Ok(())
    }

    /// Log channel bound to a guild, if any
    pub async fn sink_for(&self, guild_id: Snowflake) -> Option<Snowflake> {
        let key = binding_key(guild_id);
        let raw = match self.ctx.store().get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to read log channel binding");
                return None;
            }
        };

        match Snowflake::parse(&raw) {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(guild_id = %guild_id, value = %raw, "Ignoring malformed log channel binding");
                None
            }
        }
    }
}
