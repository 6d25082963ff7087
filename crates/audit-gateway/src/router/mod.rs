//! Dispatch routing
//!
//! Applies each dispatch to the state cache and decides what, if anything,
//! the pipeline should do with it.

mod translator;

pub use translator::{Routed, Translator};
