//! Domain entities - platform objects the logger reasons about

mod audit_log;
mod channel;
mod member;
mod message;
mod role;

pub use audit_log::{AuditLogAction, AuditLogEntry};
pub use channel::{Channel, ChannelType, UNKNOWN_CHANNEL};
pub use member::MemberSnapshot;
pub use message::Message;
pub use role::{Role, EVERYONE_ROLE_NAME};
