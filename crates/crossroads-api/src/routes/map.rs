//! Map and legend route.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::instrument;

use crossroads_session::application::query_handlers::{self, MapMarker};

use crate::state::AppState;

/// Response body for GET /api/v1/map.
#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub level: u32,
    pub markers: Vec<MapMarker>,
    pub completed: bool,
    /// The completion screen replaces the map once every situation is
    /// answered and no situation is open.
    pub completion_screen_visible: bool,
}

/// GET /api/v1/map
#[instrument(skip(state))]
async fn get_map(State(state): State<AppState>) -> Json<MapResponse> {
    let game = state.game.lock().await;
    let completed = game.playthrough.is_completed();
    Json(MapResponse {
        level: game.bundle.level(),
        markers: query_handlers::get_map_markers(&game.bundle, &game.playthrough),
        completed,
        completion_screen_visible: completed && game.session.is_none(),
    })
}

/// Returns the router for the map.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_map))
}
