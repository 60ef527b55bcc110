// ABOUTME: HubSpot bridge server binary entry point
// ABOUTME: Loads environment configuration, initializes logging, and serves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use anyhow::Result;
use hubspot_bridge::{config::ServerConfig, logging, server};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    let logging_config = logging::LoggingConfig::from_env(&config.environment);
    logging::init(&logging_config)?;

    info!(
        "Starting HubSpot bridge on port {} ({:?})",
        config.http_port, config.environment
    );
    if !config.hubspot.has_credentials() {
        warn!("HUBSPOT_CLIENT_ID / HUBSPOT_CLIENT_SECRET not set; OAuth requests will fail until configured");
    }

    server::run(config).await
}
