//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::fmt;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub platform: PlatformConfig,
    pub cache: CacheConfig,
    pub store: StoreConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Bot credential
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig").field("token", &"<redacted>").finish()
    }
}

/// Platform endpoints
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// REST base URL, without trailing slash
    pub api_url: String,
    /// Gateway WebSocket URL
    pub gateway_url: String,
    pub http_timeout_secs: u64,
    pub reconnect_delay_ms: u64,
}

/// Client-side state cache sizing
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Messages remembered per channel
    pub message_cache_size: usize,
}

/// Which key/value backend holds the guild bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Redis,
    #[default]
    File,
    Memory,
}

impl StoreBackend {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "file" => Some(Self::File),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Binding store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory used by the file backend
    pub dir: String,
    /// Required when `backend` is Redis
    pub redis: Option<RedisConfig>,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

// Default value functions
fn default_app_name() -> String {
    "guild-audit".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_api_url() -> String {
    "http://127.0.0.1:3000/api/v1".to_string()
}

fn default_gateway_url() -> String {
    "ws://127.0.0.1:3001/gateway".to_string()
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_reconnect_delay_ms() -> u64 {
    5000
}

fn default_message_cache_size() -> usize {
    200
}

fn default_store_dir() -> String {
    "./scratch".to_string()
}

fn default_redis_max_connections() -> u32 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if the token is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("BOT_TOKEN")
            .or_else(|| lookup("TOKEN"))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingVar("BOT_TOKEN"))?;

        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        let backend = match lookup("STORE_BACKEND") {
            Some(raw) => StoreBackend::parse(&raw)
                .ok_or(ConfigError::InvalidValue("STORE_BACKEND", raw))?,
            None => StoreBackend::default(),
        };

        let redis = match lookup("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: parse_or(&lookup, "REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            }),
            None if backend == StoreBackend::Redis => {
                return Err(ConfigError::MissingVar("REDIS_URL"));
            }
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            bot: BotConfig { token },
            platform: PlatformConfig {
                api_url: lookup("PLATFORM_API_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_url),
                gateway_url: lookup("PLATFORM_GATEWAY_URL").unwrap_or_else(default_gateway_url),
                http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", default_http_timeout_secs)?,
                reconnect_delay_ms: parse_or(
                    &lookup,
                    "GATEWAY_RECONNECT_DELAY_MS",
                    default_reconnect_delay_ms,
                )?,
            },
            cache: CacheConfig {
                message_cache_size: parse_or(&lookup, "MESSAGE_CACHE_SIZE", default_message_cache_size)?,
            },
            store: StoreConfig {
                backend,
                dir: lookup("STORE_DIR").unwrap_or_else(default_store_dir),
                redis,
            },
        })
    }
}

/// Parse an optional variable, falling back to a default when unset
fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
