//! Gateway events the logger consumes
//!
//! The gateway collaborator translates platform dispatches into these
//! closed variants; everything downstream matches on them exhaustively.

mod raw_event;

pub use raw_event::{
    ChannelEvent, EventKind, MemberRolesChangedEvent, MessageDeletedEvent, MessageEditedEvent,
    RawEvent, VoiceStateChange,
};
