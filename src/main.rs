//! Sui RPC Gateway
//!
//! Entry point for the gateway that serves the legacy Sui JSON-RPC API
//! from a typed ledger backend. Loads configuration from environment/.env
//! file and starts the JSON-RPC server on the configured port.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sui_rpc_gateway::config::Config;
use sui_rpc_gateway::server::start_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    info!("=== Sui RPC Gateway ===");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Serving legacy JSON-RPC over the ledger backend");
    info!("");

    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  Port: {}", config.port);
    info!("  Backend: {}", config.backend_url);
    info!("  Network: {}", config.network);
    info!("  Backend timeout: {}s", config.backend_timeout_secs);
    info!("  Log level: {}", config.log_level);
    info!("");

    start_server(config).await?;

    Ok(())
}
