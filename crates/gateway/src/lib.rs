//! API Gateway Library
//!
//! The HTTP REST API over the directory and catalog services, which run
//! in-process on one shared database pool.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tracing::info;

use common::Database;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Serve the API on an already connected database until shutdown.
pub async fn run_server_with_database(
    database: Database,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(AppState::from_database(database, config));

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
