//! # audit-cache
//!
//! Durable key/value storage for per-guild settings.
//!
//! ## Backends
//!
//! - **Redis**: pooled connections through deadpool
//! - **File**: one file per key under a directory, survives restarts
//! - **Memory**: process-local map, used by tests and throwaway runs
//!
//! ## Example
//!
//! ```ignore
//! use audit_cache::{open_store, FileStore};
//!
//! let store = open_store(&config.store).await?;
//! store.set("logChannel_42", "1001").await?;
//! assert_eq!(store.get("logChannel_42").await?.as_deref(), Some("1001"));
//! ```

pub mod pool;
pub mod store;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export store types
pub use store::{open_store, FileStore, MemoryStore, RedisStore, SharedStore};
