// ABOUTME: Server binary for the menu training back office API
// ABOUTME: Loads configuration, opens the database, and serves the axum router until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Menu Training Server Binary

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use menu_training_server::{
    auth::AuthManager, config::environment::ServerConfig, database::Database, logging,
    resources::ServerResources, routes::build_router,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "menu-training-server")]
#[command(about = "Menu Training API - restaurant back office for menus, recipes and allergies")]
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
        config.http.port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }
    config.validate()?;

    info!("Starting Menu Training API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.token_expiry_hours,
    );

    let bind_addr = format!("{}:{}", config.http.host, config.http.port);
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));
    let app = build_router(resources);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    info!("Listening on http://{bind_addr}");
    display_available_endpoints(&bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve when Ctrl+C is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
}

fn display_available_endpoints(bind_addr: &str) {
    info!("=== Available API Endpoints ===");
    info!("   Health:        GET  http://{bind_addr}/health");
    for resource in [
        "allergies",
        "equipment",
        "ingredients",
        "menu-items",
        "menu-sections",
        "menus",
        "recipes",
        "restaurants",
    ] {
        info!("   {resource:<14} http://{bind_addr}/api/{resource}");
    }
    info!("   Allergy closure:  GET http://{bind_addr}/api/ingredients/{{id}}/allergies");
    info!("   Members:          http://{bind_addr}/api/restaurants/{{id}}/users");
    info!("=== End of Endpoint List ===");
}
