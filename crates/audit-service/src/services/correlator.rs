//! Audit correlator
//!
//! A voice move looks the same whether the member switched channels or a
//! moderator dragged them. The platform's audit trail tells the two apart.

use audit_core::{AuditLogAction, AuditRecord, Snowflake};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;

/// Field appended when a move was performed by someone else
pub const MOVED_BY_FIELD: &str = "Moved By";

/// Result of an attribution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// "Moved By" was appended for this executor
    Attributed(Snowflake),
    /// The latest move was performed by the member themself
    SelfInitiated,
    /// The trail had no usable entry
    NoEntry,
    /// The trail could not be queried
    Unavailable,
}

/// Audit correlator service
pub struct AuditCorrelator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditCorrelator<'a> {
    /// Create a new AuditCorrelator
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Attribute a voice move to its executor; never fails
    #[instrument(skip(self, record))]
    pub async fn attribute_move(
        &self,
        guild_id: Snowflake,
        moved_user: Snowflake,
        record: &mut AuditRecord,
    ) -> Attribution {
        let entries = match self
            .ctx
            .platform()
            .recent_audit_entries(guild_id, AuditLogAction::MemberMove, 1)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Audit trail lookup failed, sending without attribution");
                return Attribution::Unavailable;
            }
        };

        let Some(executor) = entries.first().and_then(|entry| entry.executor_id) else {
            debug!("No member move entry in audit trail");
            return Attribution::NoEntry;
        };

        if executor == moved_user {
            return Attribution::SelfInitiated;
        }

        record.push_field(MOVED_BY_FIELD, executor.user_mention(), true);
        Attribution::Attributed(executor)
    }
}
