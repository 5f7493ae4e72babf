//! Domain events for the Session & Progress context.

use crossroads_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Emitted when a situation's answer is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecorded {
    /// The answered situation.
    pub situation_index: usize,
    /// The accepted option.
    pub option: usize,
}

/// Emitted when the last open situation is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaythroughCompleted {
    /// Number of situations answered.
    pub score: u32,
    /// Number of situations in the bundle.
    pub situation_count: u32,
}

/// Emitted when all answers are cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaythroughRestarted {
    /// Number of answers that were cleared.
    pub cleared: usize,
}

/// Event type identifier for [`AnswerRecorded`].
pub const ANSWER_RECORDED_EVENT_TYPE: &str = "progress.answer_recorded";

/// Event type identifier for [`PlaythroughCompleted`].
pub const PLAYTHROUGH_COMPLETED_EVENT_TYPE: &str = "progress.playthrough_completed";

/// Event type identifier for [`PlaythroughRestarted`].
pub const PLAYTHROUGH_RESTARTED_EVENT_TYPE: &str = "progress.playthrough_restarted";

/// Event payload variants for the Session & Progress context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEventKind {
    /// A situation's answer was recorded.
    AnswerRecorded(AnswerRecorded),
    /// Every situation has an answer.
    PlaythroughCompleted(PlaythroughCompleted),
    /// All answers were cleared.
    PlaythroughRestarted(PlaythroughRestarted),
}

impl ProgressEventKind {
    /// Routing name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AnswerRecorded(_) => ANSWER_RECORDED_EVENT_TYPE,
            Self::PlaythroughCompleted(_) => PLAYTHROUGH_COMPLETED_EVENT_TYPE,
            Self::PlaythroughRestarted(_) => PLAYTHROUGH_RESTARTED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Session & Progress context.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ProgressEventKind,
}

impl DomainEvent for ProgressEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ProgressEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
