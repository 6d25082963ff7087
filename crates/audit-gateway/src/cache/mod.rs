//! Client-side state cache
//!
//! Remembers what the gateway has shown so far, so update and delete
//! events can be described with their state from before the change.

mod state_cache;

pub use state_cache::{SharedStateCache, StateCache};
