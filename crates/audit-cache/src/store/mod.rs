//! Key/value store backends.

mod file_store;
mod memory_store;
mod redis_store;

use std::sync::Arc;

use audit_common::{StoreBackend, StoreConfig};
use audit_core::{KeyValueStore, StoreError, StoreResult};

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

/// Store shared between concurrently running event handlers
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Open the backend selected by configuration
pub async fn open_store(config: &StoreConfig) -> StoreResult<SharedStore> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; log channel bindings will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::File => Ok(Arc::new(FileStore::open(&config.dir).await?)),
        StoreBackend::Redis => {
            let redis = config
                .redis
                .as_ref()
                .ok_or_else(|| StoreError::backend("redis backend selected without REDIS_URL"))?;
            Ok(Arc::new(RedisStore::connect(redis).await?))
        }
    }
}
