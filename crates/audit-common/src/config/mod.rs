//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BotConfig, CacheConfig, ConfigError, Environment, PlatformConfig,
    RedisConfig, StoreBackend, StoreConfig,
};
