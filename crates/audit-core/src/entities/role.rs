//! Role entity - a named guild role

use crate::value_objects::Snowflake;

/// Name of the implicit role every member holds
pub const EVERYONE_ROLE_NAME: &str = "@everyone";

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
}

impl Role {
    /// Create a new Role
    pub fn new(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
        }
    }

    /// Check if this is the @everyone role (its id equals the guild id)
    #[inline]
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id || self.name == EVERYONE_ROLE_NAME
    }
}
