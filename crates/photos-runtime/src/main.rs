//! # Photo-Vault Runtime
//!
//! The main entry point for the photo service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from the environment
//! 3. Validate the signing key and base URL
//! 4. Wire access control, persistence and identity into the gateway
//! 5. Serve until Ctrl+C

use anyhow::{Context, Result};
use photos_runtime::{PhotosRuntime, RuntimeConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = RuntimeConfig::from_env().context("failed to load configuration")?;
    info!(addr = %config.gateway.http_addr(), "Configuration loaded");

    let runtime = PhotosRuntime::new(config)?;

    info!("Photo service is running. Press Ctrl+C to stop.");
    runtime
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
