//! Ports - interfaces the domain needs from the outside world

mod ports;

pub use ports::{KeyValueStore, Platform, PlatformResult, StoreResult};
