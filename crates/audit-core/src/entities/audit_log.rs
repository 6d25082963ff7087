//! Audit log entry - one row of the platform's moderation audit trail

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Audit log action types the logger knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum AuditLogAction {
    ChannelCreate = 10,
    ChannelDelete = 12,
    MemberRoleUpdate = 25,
    /// A moderator moved a member between voice channels
    MemberMove = 26,
    MemberDisconnect = 27,
    MessageDelete = 72,
}

impl AuditLogAction {
    /// Get the raw action type
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create from a raw action type
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            10 => Some(Self::ChannelCreate),
            12 => Some(Self::ChannelDelete),
            25 => Some(Self::MemberRoleUpdate),
            26 => Some(Self::MemberMove),
            27 => Some(Self::MemberDisconnect),
            72 => Some(Self::MessageDelete),
            _ => None,
        }
    }
}

/// Audit trail entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub id: Snowflake,
    pub action_type: i32,
    /// User that performed the action
    pub executor_id: Option<Snowflake>,
    pub target_id: Option<Snowflake>,
}

impl AuditLogEntry {
    /// Known action, if any
    pub fn action(&self) -> Option<AuditLogAction> {
        AuditLogAction::from_i32(self.action_type)
    }
}
