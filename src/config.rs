use anyhow::{Context, Result};
use std::env;

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger backend base URL
    pub backend_url: String,
    /// Network label, reported at startup
    pub network: String,
    /// Per-call timeout for backend requests, in seconds
    pub backend_timeout_secs: u64,
    /// RPC server port
    pub port: u16,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Call dotenvy::dotenv() before calling this.
    pub fn from_env() -> Result<Self> {
        let backend_url = env::var("SUI_GRPC_URL")
            .unwrap_or_else(|_| "https://fullnode.mainnet.sui.io:443".to_string());

        let network = env::var("SUI_NETWORK").unwrap_or_else(|_| "mainnet".to_string());

        let backend_timeout_secs: u64 = env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("BACKEND_TIMEOUT_SECS must be a valid u64")?;

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            backend_url,
            network,
            backend_timeout_secs,
            port,
            log_level,
        })
    }
}
