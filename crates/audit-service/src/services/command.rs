//! Command handler - binds a guild to its log channel

use audit_core::Snowflake;
use tracing::{info, instrument, warn};

use super::config_store::ConfigStore;
use super::context::ServiceContext;

/// The one administrative command
pub const BIND_COMMAND: &str = "!setbeta";

/// Reply sent when the binding could not be stored
pub const BIND_FAILED_REPLY: &str = "An error occurred while setting the log channel.";

fn bound_reply(channel_id: Snowflake) -> String {
    format!("Log channel set to {} successfully.", channel_id.channel_mention())
}

/// Result of looking at one created message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Not a command, or not sent in a guild
    Ignored,
    Bound,
    BindFailed,
}

/// Command handler service
pub struct CommandHandler<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommandHandler<'a> {
    /// Create a new CommandHandler
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check a newly created message for the bind command
    #[instrument(skip(self, content))]
    pub async fn handle_message(
        &self,
        guild_id: Option<Snowflake>,
        channel_id: Snowflake,
        content: &str,
    ) -> CommandOutcome {
        if content != BIND_COMMAND {
            return CommandOutcome::Ignored;
        }
        let Some(guild_id) = guild_id else {
            return CommandOutcome::Ignored;
        };

        let (outcome, reply) = match ConfigStore::new(self.ctx).bind(guild_id, channel_id).await {
            Ok(()) => {
                info!("Log channel bound");
                (CommandOutcome::Bound, bound_reply(channel_id))
            }
            Err(e) => {
                warn!(error = %e, "Failed to store log channel binding");
                (CommandOutcome::BindFailed, BIND_FAILED_REPLY.to_string())
            }
        };

        if let Err(e) = self.ctx.platform().send_text(channel_id, &reply).await {
            warn!(error = %e, "Failed to send command reply");
        }
        outcome
    }
}
