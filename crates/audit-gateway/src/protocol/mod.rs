//! Gateway protocol definitions
//!
//! Op codes, message envelope, close codes, and the payloads this client
//! sends or expects.

mod close_codes;
mod intents;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::{CloseCode, CloseDisposition};
pub use intents::GatewayIntents;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
