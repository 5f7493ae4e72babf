//! Query handlers for the Session & Progress context.

use crossroads_content::domain::bundle::ContentBundle;
use crossroads_core::aggregate::AggregateRoot;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::Playthrough;

/// Seconds between the appearance of consecutive map markers.
pub const MARKER_STAGGER_SECONDS: f64 = 0.5;

/// Read-only view of a playthrough.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    /// The playthrough identifier.
    pub playthrough_id: Uuid,
    /// Accepted answer per situation; `None` when unanswered.
    pub answers: Vec<Option<usize>>,
    pub answered_count: usize,
    pub situation_count: usize,
    pub score: u32,
    pub level: u32,
    pub completed: bool,
    /// Current version (event count).
    pub version: i64,
}

/// A situation's marker on the map and in the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub index: usize,
    /// Translated header.
    pub header: String,
    pub position: [f32; 2],
    pub resolved: bool,
    /// Unresolved markers bounce to draw attention.
    pub bounce: bool,
    pub appear_delay_secs: f64,
}

/// Returns the progress view of a playthrough.
#[must_use]
pub fn get_progress(playthrough: &Playthrough) -> ProgressView {
    ProgressView {
        playthrough_id: playthrough.aggregate_id(),
        answers: playthrough.answers().to_vec(),
        answered_count: playthrough.answered_count(),
        situation_count: playthrough.situation_count(),
        score: playthrough.score(),
        level: playthrough.level(),
        completed: playthrough.is_completed(),
        version: playthrough.version(),
    }
}

/// Lays out one marker per situation in bundle order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn get_map_markers(bundle: &ContentBundle, playthrough: &Playthrough) -> Vec<MapMarker> {
    let translations = bundle.translations();
    bundle
        .situations()
        .iter()
        .enumerate()
        .map(|(index, situation)| {
            let resolved = playthrough.answer(index).is_some();
            MapMarker {
                index,
                header: translations.resolve(&situation.header).to_owned(),
                position: situation.position,
                resolved,
                bounce: !resolved,
                appear_delay_secs: index as f64 * MARKER_STAGGER_SECONDS,
            }
        })
        .collect()
}
