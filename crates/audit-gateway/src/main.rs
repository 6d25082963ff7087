//! Guild audit logger entry point
//!
//! Run with:
//! ```bash
//! cargo run -p audit-gateway
//! ```
//!
//! Configuration is loaded from environment variables and `.env`.

use audit_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(e) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {e}");
            }
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        gateway = %config.platform.gateway_url,
        "Starting guild audit logger"
    );

    tokio::select! {
        result = audit_gateway::run(config) => {
            if let Err(e) = result {
                error!(error = %e, code = e.error_code(), "Audit logger stopped");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }
}
