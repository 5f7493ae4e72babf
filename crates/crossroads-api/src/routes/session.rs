//! Routes for the active conflict session.
//!
//! One situation is open at a time. Interaction responses carry the render
//! view, the events the interaction produced and the sounds to play. An
//! accepted answer is recorded in the playthrough within the same request.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crossroads_core::clock::Clock;
use crossroads_core::error::DomainError;
use crossroads_core::event::RecordedEvent;
use crossroads_narrative::application::command_handlers::{
    self, InteractionOutcome, SoundCue,
};
use crossroads_narrative::application::query_handlers::{self, SessionView};
use crossroads_narrative::domain::aggregates::ConflictSession;
use crossroads_narrative::domain::commands;
use crossroads_session::application::command_handlers::{
    ProgressOutcome, handle_record_answer,
};
use crossroads_session::domain::commands::RecordAnswer;

use crate::error::ApiError;
use crate::state::{AppState, Game};

/// Request body for POST /session/advance.
#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    /// Seconds of animation time since the previous advance.
    pub elapsed: f64,
}

/// Request body for POST /session/select.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// Zero-based option index.
    pub option: usize,
}

/// Response body returned after an interaction.
#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    pub session: SessionView,
    pub events: Vec<RecordedEvent>,
    pub sound_cues: Vec<SoundCue>,
    /// Progress change caused by an accepted answer.
    pub progress: Option<ProgressOutcome>,
}

/// Response body returned after closing the session.
#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub situation_index: usize,
    pub events: Vec<RecordedEvent>,
}

/// Closes the open session, if any.
pub(crate) fn close_active(
    game: &mut Game,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Option<CloseResponse> {
    let mut session = game.session.take()?;
    let outcome = command_handlers::handle_close_situation(
        &commands::CloseSituation { correlation_id },
        &mut session,
        clock,
    );
    Some(CloseResponse {
        situation_index: session.situation_index(),
        events: outcome.events,
    })
}

/// Runs `interaction` against the active session, then records an accepted
/// answer and renders the session.
async fn interact<F>(
    state: &AppState,
    correlation_id: Uuid,
    interaction: F,
) -> Result<Json<InteractionResponse>, ApiError>
where
    F: FnOnce(&mut ConflictSession, &dyn Clock) -> InteractionOutcome + Send,
{
    let mut game = state.game.lock().await;
    let Game {
        playthrough,
        session,
        ..
    } = &mut *game;
    let session = session.as_mut().ok_or(DomainError::NoActiveSession)?;

    let outcome = interaction(session, state.clock.as_ref());

    let progress = match outcome.answered {
        Some(option) => {
            let command = RecordAnswer {
                correlation_id,
                situation_index: session.situation_index(),
                option,
            };
            Some(
                handle_record_answer(
                    &command,
                    playthrough,
                    state.clock.as_ref(),
                    state.reporter.as_ref(),
                )
                .await?,
            )
        }
        None => None,
    };

    Ok(Json(InteractionResponse {
        session: query_handlers::get_session_view(Some(session))?,
        events: outcome.events,
        sound_cues: outcome.sound_cues,
        progress,
    }))
}

/// POST /situations/{index}/open
#[instrument(skip(state))]
async fn open_situation(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<InteractionResponse>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, situation_index = index, "handling open_situation command");

    let mut game = state.game.lock().await;
    // Validate before closing the session that is already open.
    game.bundle.situation(index)?;
    close_active(&mut game, correlation_id, state.clock.as_ref());

    let command = commands::OpenSituation {
        correlation_id,
        situation_index: index,
        recorded_answer: game.playthrough.answer(index),
    };
    let (session, outcome) =
        command_handlers::handle_open_situation(&command, &game.bundle, state.clock.as_ref())?;
    let view = query_handlers::get_session_view(Some(&session))?;
    game.session = Some(session);

    Ok(Json(InteractionResponse {
        session: view,
        events: outcome.events,
        sound_cues: outcome.sound_cues,
        progress: None,
    }))
}

/// GET /session
#[instrument(skip(state))]
async fn get_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let game = state.game.lock().await;
    Ok(Json(query_handlers::get_session_view(game.session.as_ref())?))
}

/// POST /session/advance
#[instrument(skip(state, request), fields(elapsed = request.elapsed))]
async fn advance(
    State(state): State<AppState>,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<InteractionResponse>, ApiError> {
    let command = commands::AdvanceTimeline {
        correlation_id: Uuid::new_v4(),
        elapsed_secs: request.elapsed,
    };
    interact(&state, command.correlation_id, |session, clock| {
        command_handlers::handle_advance_timeline(&command, session, clock)
    })
    .await
}

/// POST /session/skip
#[instrument(skip(state))]
async fn skip(State(state): State<AppState>) -> Result<Json<InteractionResponse>, ApiError> {
    let command = commands::SkipStep {
        correlation_id: Uuid::new_v4(),
    };
    interact(&state, command.correlation_id, |session, clock| {
        command_handlers::handle_skip_step(&command, session, clock)
    })
    .await
}

/// POST /session/select
#[instrument(skip(state, request), fields(option = request.option))]
async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<InteractionResponse>, ApiError> {
    let command = commands::SelectOption {
        correlation_id: Uuid::new_v4(),
        option: request.option,
    };
    interact(&state, command.correlation_id, |session, clock| {
        command_handlers::handle_select_option(&command, session, clock)
    })
    .await
}

/// POST /session/confirm
#[instrument(skip(state))]
async fn confirm(State(state): State<AppState>) -> Result<Json<InteractionResponse>, ApiError> {
    let command = commands::ConfirmSelection {
        correlation_id: Uuid::new_v4(),
    };
    info!(correlation_id = %command.correlation_id, "handling confirm_selection command");
    interact(&state, command.correlation_id, |session, clock| {
        command_handlers::handle_confirm_selection(&command, session, clock)
    })
    .await
}

/// POST /session/reject
#[instrument(skip(state))]
async fn reject(State(state): State<AppState>) -> Result<Json<InteractionResponse>, ApiError> {
    let command = commands::RejectSelection {
        correlation_id: Uuid::new_v4(),
    };
    interact(&state, command.correlation_id, |session, clock| {
        command_handlers::handle_reject_selection(&command, session, clock)
    })
    .await
}

/// POST /session/retry
#[instrument(skip(state))]
async fn retry(State(state): State<AppState>) -> Result<Json<InteractionResponse>, ApiError> {
    let command = commands::RetryDecision {
        correlation_id: Uuid::new_v4(),
    };
    interact(&state, command.correlation_id, |session, clock| {
        command_handlers::handle_retry_decision(&command, session, clock)
    })
    .await
}

/// POST /session/replay
#[instrument(skip(state))]
async fn replay(State(state): State<AppState>) -> Result<Json<InteractionResponse>, ApiError> {
    let command = commands::ReplaySequence {
        correlation_id: Uuid::new_v4(),
    };
    interact(&state, command.correlation_id, |session, clock| {
        command_handlers::handle_replay_sequence(&command, session, clock)
    })
    .await
}

/// DELETE /session
#[instrument(skip(state))]
async fn close(State(state): State<AppState>) -> Result<Json<CloseResponse>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling close_situation command");

    let mut game = state.game.lock().await;
    let closed = close_active(&mut game, correlation_id, state.clock.as_ref())
        .ok_or(DomainError::NoActiveSession)?;
    Ok(Json(closed))
}

/// Returns the router for situations and the active session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/situations/{index}/open", post(open_situation))
        .route("/session", get(get_session).delete(close))
        .route("/session/advance", post(advance))
        .route("/session/skip", post(skip))
        .route("/session/select", post(select))
        .route("/session/confirm", post(confirm))
        .route("/session/reject", post(reject))
        .route("/session/retry", post(retry))
        .route("/session/replay", post(replay))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use crossroads_test_support::{FixedClock, RecordingReporter, fixtures};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        AppState::new(
            fixtures::scenario_bundle(),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            )),
            Arc::new(RecordingReporter::new()),
        )
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let app = router().with_state(state.clone());
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_open_situation_returns_presenting_view() {
        // Arrange
        let state = test_app_state();

        // Act
        let (status, json) = send(&state, "POST", "/situations/0/open", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["session"]["phase"]["state"], "presenting");
        assert_eq!(json["session"]["header"], "Blocked loading bay");
        assert_eq!(json["events"][0]["event_type"], "interaction.sequence_started");
        assert!(state.game.lock().await.session.is_some());
    }

    #[tokio::test]
    async fn test_open_unknown_situation_returns_404_and_keeps_session() {
        // Arrange
        let state = test_app_state();
        send(&state, "POST", "/situations/0/open", None).await;

        // Act
        let (status, json) = send(&state, "POST", "/situations/9/open", None).await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "situation_not_found");
        assert_eq!(
            state
                .game
                .lock()
                .await
                .session
                .as_ref()
                .map(ConflictSession::situation_index),
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_interaction_without_session_returns_409() {
        let state = test_app_state();

        let (status, json) = send(&state, "POST", "/session/skip", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "no_active_session");
    }

    #[tokio::test]
    async fn test_correct_confirmation_records_progress() {
        // Arrange
        let state = test_app_state();
        send(&state, "POST", "/situations/0/open", None).await;
        send(
            &state,
            "POST",
            "/session/advance",
            Some(serde_json::json!({ "elapsed": 60.0 })),
        )
        .await;
        send(
            &state,
            "POST",
            "/session/select",
            Some(serde_json::json!({ "option": 1 })),
        )
        .await;

        // Act
        let (status, json) = send(&state, "POST", "/session/confirm", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sound_cues"], serde_json::json!(["correct"]));
        assert_eq!(json["progress"]["events"][0]["event_type"], "progress.answer_recorded");
        assert_eq!(state.game.lock().await.playthrough.answer(0), Some(1));
    }

    #[tokio::test]
    async fn test_close_ends_session() {
        // Arrange
        let state = test_app_state();
        send(&state, "POST", "/situations/1/open", None).await;

        // Act
        let (status, json) = send(&state, "DELETE", "/session", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["situation_index"], 1);
        assert_eq!(json["events"][0]["event_type"], "interaction.session_closed");
        assert!(state.game.lock().await.session.is_none());
    }
}
