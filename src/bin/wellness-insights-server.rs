// ABOUTME: Server binary for the wellness insights HTTP API
// ABOUTME: Loads configuration, initializes logging, wires providers, and serves until SIGTERM/Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # Wellness Insights Server Binary
//!
//! Starts the insights API with Gemini as the primary provider and an
//! OpenAI-compatible provider (Together AI by default) as the fallback.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use wellness_insights::{
    config::{RouteMode, ServerConfig},
    lifecycle::{listen_for_os_signals, ShutdownController},
    logging::LoggingConfig,
    resources::ServerResources,
    server,
};

/// Command-line overrides applied on top of the environment configuration
#[derive(Parser)]
#[command(name = "wellness-insights-server")]
#[command(about = "Wellness Insights API - health-context aware LLM insights")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override provider route mode (primary, secondary, auto)
    #[arg(long)]
    route_mode: Option<RouteMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig::from_env().init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(mode) = args.route_mode {
        config.router.mode = mode;
    }
    config.validate()?;

    info!("Starting Wellness Insights API");
    info!("{}", config.summary());

    let shutdown = Arc::new(ShutdownController::new());
    let resources = Arc::new(ServerResources::from_config(&config, shutdown.signal())?);

    let signal_controller = Arc::clone(&shutdown);
    tokio::spawn(async move {
        listen_for_os_signals(&signal_controller).await;
    });

    if let Err(e) = server::run(resources, &config.http, shutdown.signal()).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Shutdown complete");
    Ok(())
}
