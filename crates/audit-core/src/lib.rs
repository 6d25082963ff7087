//! # audit-core
//!
//! Domain layer for the guild audit logger: platform entities, the closed
//! set of gateway events, normalized audit records, and the ports the
//! service layer talks through. This crate performs no I/O.

pub mod entities;
pub mod error;
pub mod events;
pub mod record;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuditLogAction, AuditLogEntry, Channel, ChannelType, MemberSnapshot, Message, Role,
    EVERYONE_ROLE_NAME, UNKNOWN_CHANNEL,
};
pub use error::{PlatformError, StoreError};
pub use events::{
    ChannelEvent, EventKind, MemberRolesChangedEvent, MessageDeletedEvent, MessageEditedEvent,
    RawEvent, VoiceStateChange,
};
pub use record::{AuditRecord, RecordColor, RecordField, FIELD_VALUE_LIMIT, NO_CONTENT};
pub use traits::{KeyValueStore, Platform, PlatformResult, StoreResult};
pub use value_objects::{Snowflake, SnowflakeParseError};
