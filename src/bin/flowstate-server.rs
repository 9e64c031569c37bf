// ABOUTME: FlowState server binary: loads configuration, connects resources and serves HTTP
// ABOUTME: Mounts the permission error log subscriber and shuts down gracefully on Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # FlowState Server Binary
//!
//! Configuration comes from the environment; `--http-port` and `--database-url`
//! override the corresponding variables.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use flowstate::config::ServerConfig;
use flowstate::logging::{self, AppLogger};
use flowstate::resources::ServerResources;
use flowstate::server;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "flowstate-server")]
#[command(about = "FlowState - workout logging, progress tracking and AI exercise suggestions")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    info!("Starting FlowState server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(config).await?);
    info!("Database connected and migrated");

    // Lives for the whole process
    resources
        .permission_errors
        .subscribe(AppLogger::log_permission_error)
        .detach();

    if let Err(e) = server::serve(Arc::clone(&resources), shutdown_signal()).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    info!("FlowState server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
