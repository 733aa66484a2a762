//! Main entry point for the Masar server.
//!
//! This file sets up logging, connects the database, and starts the HTTP
//! server with graceful shutdown.

use std::sync::Arc;

use masar_server::{
    model::{self, common::AppState},
    startup::{self, LoggingConfig},
};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize configuration and logging
    let configuration = model::common::Configuration::new();

    let logging_config =
        LoggingConfig::from_config(configuration.log_dir(), configuration.log_level());
    let _logging_guard = startup::init_logging(&logging_config)?;

    let server_address = configuration.server_address();
    let server_port = configuration.server_main_port();
    let context_path = configuration.server_context_path();

    // Connect the database before accepting traffic
    let db = configuration.database_connection().await?;
    info!("Database connection established");

    let app_state = Arc::new(AppState::new(configuration, db));

    let server = startup::main_server(
        app_state,
        context_path.clone(),
        server_address.clone(),
        server_port,
    )?;
    let server_handle = server.handle();

    info!(
        address = %server_address,
        port = server_port,
        context_path = %context_path,
        "Masar server started"
    );

    let shutdown = startup::wait_for_shutdown_signal().await;
    let mut shutdown_rx = shutdown.subscribe();

    tokio::select! {
        result = server => {
            result?;
        }
        _ = shutdown_rx.recv() => {
            info!("Shutting down HTTP server...");
            server_handle.stop(true).await;
        }
    }

    info!("Masar server stopped");

    Ok(())
}
