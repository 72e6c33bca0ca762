mod api;
mod config;
mod device;
mod error;
mod signal;
mod token;

use anyhow::Context;
use api::HttpApi;
use config::DeviceConfig;
use device::DeviceRunner;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = DeviceConfig::from_env().context("failed to read device configuration")?;
    config.validate().context("invalid device configuration")?;

    info!("Mock device starting: {} signal", config.signal);
    info!("  Server: {}", config.base_url);
    info!("  Token file: {}", config.token_file.display());

    let api = Arc::new(HttpApi::new(&config).context("failed to build HTTP client")?);
    let signal = config.signal.build();
    let mut runner = DeviceRunner::new(config, api, signal);

    tokio::select! {
        _ = runner.run() => {
            error!("Run loop exited");
        }
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for shutdown signal")?;
            info!(authenticated = runner.state().is_authenticated(), "Shutting down");
        }
    }

    Ok(())
}
