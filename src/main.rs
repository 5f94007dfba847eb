// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use web_summarizer::{
    api::{ApiServer, AppState},
    cli::Cli,
    config::Settings,
    version,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    cli.apply(&mut settings);
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    // RUST_LOG wins over DEBUG
    let default_level = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting {} ({})", settings.app_name, version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));
    if !settings.qwen_configured() {
        warn!("DASHSCOPE_API_KEY is not set; summarize requests will fail");
    }

    let listen_addr = settings.listen_addr();
    let state = AppState::from_settings(settings)?;
    let server = ApiServer::start(&listen_addr, state).await?;
    info!("Listening on http://{}", server.local_addr());

    signal::ctrl_c().await?;
    info!("Shutdown signal received");
    server.shutdown().await;

    Ok(())
}
