//! Audit pipeline - runs one raw event through every stage
//!
//! resolve → normalize → correlate (voice moves only) → dispatch.
//! Handlers for different events may interleave; each invocation works on
//! its own data and shares only the store and platform.

use audit_core::{EventKind, RawEvent, Snowflake};
use chrono::Utc;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

use super::command::{CommandHandler, CommandOutcome};
use super::context::ServiceContext;
use super::correlator::{Attribution, AuditCorrelator};
use super::dispatcher::{DispatchOutcome, Dispatcher};
use super::normalizer::{EventNormalizer, VoiceTransition};
use super::resolver::PartialResolver;

/// Final state of one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A partial payload could not be fetched; the event was dropped
    Unresolved { error: String },
    /// Nothing worth recording happened
    NoRecord,
    /// A record was built and handed to the dispatcher
    Dispatched {
        kind: EventKind,
        attribution: Option<Attribution>,
        outcome: DispatchOutcome,
    },
}

impl PipelineOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Dispatched { outcome, .. } if outcome.is_delivered())
    }
}

/// Audit pipeline
#[derive(Debug, Clone)]
pub struct AuditPipeline {
    ctx: ServiceContext,
    normalizer: EventNormalizer,
}

impl AuditPipeline {
    /// Create a new pipeline over the given collaborators
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            normalizer: EventNormalizer::new(),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Process one gateway event to completion
    #[instrument(
        skip_all,
        fields(
            event_id = %Uuid::new_v4(),
            guild_id = %event.guild_id(),
            event = event.name(),
            kind = tracing::field::Empty,
        )
    )]
    pub async fn handle_event(&self, event: RawEvent) -> PipelineOutcome {
        let event = match PartialResolver::new(&self.ctx).resolve(event).await {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Dropping event with unresolvable payload");
                return PipelineOutcome::Unresolved {
                    error: e.to_string(),
                };
            }
        };

        let Some(mut normalized) = self.normalizer.normalize(&event, Utc::now()) else {
            debug!("Nothing to record");
            return PipelineOutcome::NoRecord;
        };
        Span::current().record("kind", normalized.kind.as_str());

        let attribution = match &event {
            RawEvent::VoiceStateChanged(change)
                if matches!(VoiceTransition::classify(change), Some(VoiceTransition::Moved { .. })) =>
            {
                Some(
                    AuditCorrelator::new(&self.ctx)
                        .attribute_move(change.guild_id, change.user_id, &mut normalized.record)
                        .await,
                )
            }
            _ => None,
        };

        let outcome = Dispatcher::new(&self.ctx)
            .deliver(event.guild_id(), &normalized.record, normalized.origin)
            .await;

        PipelineOutcome::Dispatched {
            kind: normalized.kind,
            attribution,
            outcome,
        }
    }

    /// Check a created message for the bind command
    pub async fn handle_command(
        &self,
        guild_id: Option<Snowflake>,
        channel_id: Snowflake,
        content: &str,
    ) -> CommandOutcome {
        CommandHandler::new(&self.ctx)
            .handle_message(guild_id, channel_id, content)
            .await
    }
}
