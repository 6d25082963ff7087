//! Member snapshot - a member's role set at one point in time

use crate::entities::Role;
use crate::value_objects::Snowflake;

/// Guild member roles as observed before or after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub roles: Vec<Role>,
}

impl MemberSnapshot {
    /// Create a new snapshot
    pub fn new(guild_id: Snowflake, user_id: Snowflake, roles: Vec<Role>) -> Self {
        Self {
            guild_id,
            user_id,
            roles,
        }
    }

    /// Get number of roles
    #[inline]
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Role names in order, excluding @everyone
    pub fn visible_role_names(&self) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|r| !r.is_everyone())
            .map(|r| r.name.as_str())
            .collect()
    }
}
