//! Shared application state.

use std::sync::Arc;

use crossroads_content::domain::bundle::ContentBundle;
use crossroads_core::clock::Clock;
use crossroads_core::report::ProgressReporter;
use crossroads_narrative::domain::aggregates::ConflictSession;
use crossroads_session::domain::aggregates::Playthrough;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Everything one player's game consists of.
#[derive(Debug)]
pub struct Game {
    pub bundle: Arc<ContentBundle>,
    pub playthrough: Playthrough,
    /// The open situation; at most one at a time.
    pub session: Option<ConflictSession>,
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to stamp domain events.
    pub clock: Arc<dyn Clock>,
    /// Receives the completion report.
    pub reporter: Arc<dyn ProgressReporter>,
    /// The game behind a lock, held for the whole of each interaction.
    pub game: Arc<Mutex<Game>>,
}

impl AppState {
    /// Create new application state with a fresh playthrough of `bundle`.
    #[must_use]
    pub fn new(
        bundle: ContentBundle,
        clock: Arc<dyn Clock>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        let playthrough = Playthrough::for_bundle(Uuid::new_v4(), &bundle);
        Self {
            clock,
            reporter,
            game: Arc::new(Mutex::new(Game {
                bundle: Arc::new(bundle),
                playthrough,
                session: None,
            })),
        }
    }
}
