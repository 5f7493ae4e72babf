//! Crossroads API — HTTP host for the conflict-resolution game.
//!
//! Serves the map, drives the single active conflict session and tracks
//! playthrough progress.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod reporter;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Builds the application router.
pub fn app(state: state::AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the host application's origin.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/map", routes::map::router())
        .nest("/api/v1/progress", routes::progress::router())
        .nest("/api/v1", routes::session::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
