//! # audit-gateway
//!
//! Gateway client for the guild audit logger: keeps a session open,
//! mirrors guild state into a local cache, translates dispatches into raw
//! events, and runs each through the audit pipeline.

pub mod cache;
pub mod client;
pub mod error;
pub mod events;
pub mod http;
pub mod protocol;
pub mod router;

use std::sync::Arc;

use audit_cache::open_store;
use audit_common::{AppConfig, AppError, AppResult};
use audit_core::PlatformError;
use audit_service::{AuditPipeline, ServiceContext};
use tracing::info;

pub use cache::{SharedStateCache, StateCache};
pub use client::{GatewayClient, GatewayConfig};
pub use error::{GatewayError, GatewayResult};
pub use http::{PlatformClient, RestClient, RestConfig};
pub use router::{Routed, Translator};

/// Wire everything together and run until a fatal error
pub async fn run(config: AppConfig) -> AppResult<()> {
    let store = open_store(&config.store).await?;
    info!(backend = ?config.store.backend, "Store opened");

    let rest = RestClient::new(&RestConfig::from_app_config(&config))?;
    let me = rest.current_user().await.map_err(|e| match e {
        PlatformError::Unauthorized => AppError::InvalidCredential("token rejected by the platform".into()),
        other => other.into(),
    })?;
    info!(user_id = %me.id, user = %me.tag(), "Credential accepted");

    let cache = StateCache::new_shared(config.cache.message_cache_size);
    let platform = PlatformClient::new(rest, cache.clone());
    let pipeline = AuditPipeline::new(ServiceContext::new(Arc::new(platform), store));

    let client = GatewayClient::new(
        GatewayConfig::from_app_config(&config),
        Translator::new(cache),
        pipeline,
    );
    client.run().await?;

    Ok(())
}
