//! Application startup and server initialization.
//!
//! Handles creation of the metrics registry, the background collector
//! task, and the HTTP server with its routes.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// Constructs the metrics registry, spawns the process-metrics collector,
/// binds to the configured address and starts serving requests.
///
/// # Errors
///
/// Returns an error if the server encounters a runtime error during
/// execution. Failure to bind the listener is fatal and panics.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Metrics::new();
    // The collector runs until process exit; the handle is never joined.
    let _collector = metrics.spawn_collector();

    info!("Starting server on {}", config.bind_address);

    let state = AppState {
        config: config.clone(),
        metrics,
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .expect("Could not bind to specified address");

    axum::serve(listener, app).await?;

    Ok(())
}
