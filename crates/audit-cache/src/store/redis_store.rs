//! Redis-backed store.

use async_trait::async_trait;
use audit_common::RedisConfig;
use audit_core::{KeyValueStore, StoreResult};

use crate::pool::RedisPool;

/// Key/value store on top of the shared Redis pool
#[derive(Debug, Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    /// Wrap an existing pool
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Build a pool from config and verify the server answers
    pub async fn connect(config: &RedisConfig) -> StoreResult<Self> {
        let pool = RedisPool::from_config(config)?;
        pool.health_check().await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.pool.get_string(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.pool.set_string(key, value).await?;
        Ok(())
    }
}
