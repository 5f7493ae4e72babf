//! Crossroads API server entry point.

use std::sync::Arc;

use crossroads_api::config::Config;
use crossroads_api::error::AppError;
use crossroads_api::reporter::TracingReporter;
use crossroads_api::state::AppState;
use crossroads_api::telemetry;
use crossroads_content::application::loader::load_bundle;
use crossroads_core::clock::SystemClock;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let tracer_provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!("Starting Crossroads API server");

    let bundle = load_bundle(&config.content_path).await?;
    let app_state = AppState::new(bundle, Arc::new(SystemClock), Arc::new(TracingReporter));
    let app = crossroads_api::app(app_state);

    let addr = config.socket_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            warn!(error = %e, "tracer provider shutdown failed");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
