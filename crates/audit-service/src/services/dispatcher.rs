//! Dispatcher - delivers records to a guild's log channel
//!
//! Steps, in order: look up the binding, resolve the bound channel, apply
//! the anti-loop rule, send. Every failure ends delivery for this record
//! only and is reported through [`DispatchOutcome`].

use audit_core::{AuditRecord, Snowflake};
use tracing::{debug, info, instrument, warn};

use super::config_store::ConfigStore;
use super::context::ServiceContext;

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Sent to the log channel
    Delivered { sink: Snowflake },
    /// No log channel bound for the guild
    Disabled,
    /// The bound channel no longer resolves
    StaleSink { sink: Snowflake },
    /// The event happened in the log channel itself
    Suppressed { sink: Snowflake },
    /// The send itself failed
    Failed { sink: Snowflake, error: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Dispatcher service
pub struct Dispatcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> Dispatcher<'a> {
    /// Create a new Dispatcher
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Deliver a record for an event that happened in `origin`
    #[instrument(skip(self, record), fields(title = %record.title))]
    pub async fn deliver(
        &self,
        guild_id: Snowflake,
        record: &AuditRecord,
        origin: Option<Snowflake>,
    ) -> DispatchOutcome {
        let Some(sink_id) = ConfigStore::new(self.ctx).sink_for(guild_id).await else {
            debug!("No log channel bound, skipping");
            return DispatchOutcome::Disabled;
        };

        let sink = match self.ctx.platform().resolve_channel(sink_id).await {
            Ok(Some(channel)) => channel,
            Ok(None) => {
                warn!(sink = %sink_id, "Bound log channel no longer exists");
                return DispatchOutcome::StaleSink { sink: sink_id };
            }
            Err(e) => {
                warn!(sink = %sink_id, error = %e, "Bound log channel could not be resolved");
                return DispatchOutcome::StaleSink { sink: sink_id };
            }
        };

        if origin == Some(sink.id) {
            debug!(sink = %sink.id, "Event concerns the log channel itself, suppressed");
            return DispatchOutcome::Suppressed { sink: sink.id };
        }

        match self.ctx.platform().send_record(sink.id, record).await {
            Ok(()) => {
                info!(sink = %sink.id, "Audit record delivered");
                DispatchOutcome::Delivered { sink: sink.id }
            }
            Err(e) => {
                warn!(sink = %sink.id, error = %e, "Failed to send audit record");
                DispatchOutcome::Failed {
                    sink: sink.id,
                    error: e.to_string(),
                }
            }
        }
    }
}
