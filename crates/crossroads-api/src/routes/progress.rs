//! Progress routes.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crossroads_session::application::command_handlers::{self, ProgressOutcome};
use crossroads_session::application::query_handlers::{self, ProgressView};
use crossroads_session::domain::commands::RestartPlaythrough;

use crate::routes::session::{CloseResponse, close_active};
use crate::state::AppState;

/// Response body for POST /api/v1/progress/restart.
#[derive(Debug, Serialize)]
pub struct RestartResponse {
    #[serde(flatten)]
    pub outcome: ProgressOutcome,
    /// The session that was open when the playthrough restarted.
    pub closed: Option<CloseResponse>,
    pub progress: ProgressView,
}

/// GET /api/v1/progress
#[instrument(skip(state))]
async fn get_progress(State(state): State<AppState>) -> Json<ProgressView> {
    let game = state.game.lock().await;
    Json(query_handlers::get_progress(&game.playthrough))
}

/// POST /api/v1/progress/restart
#[instrument(skip(state))]
async fn restart(State(state): State<AppState>) -> Json<RestartResponse> {
    let command = RestartPlaythrough {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling restart_playthrough command");

    let mut game = state.game.lock().await;
    // An open session remembers its accepted answer; it must not outlive the
    // progress it was recorded in.
    let closed = close_active(&mut game, command.correlation_id, state.clock.as_ref());
    let outcome = command_handlers::handle_restart_playthrough(
        &command,
        &mut game.playthrough,
        state.clock.as_ref(),
    );
    Json(RestartResponse {
        outcome,
        closed,
        progress: query_handlers::get_progress(&game.playthrough),
    })
}

/// Returns the router for progress.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_progress))
        .route("/restart", post(restart))
}
