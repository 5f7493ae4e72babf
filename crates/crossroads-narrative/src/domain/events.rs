//! Domain events for the conflict interaction.

use crossroads_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

pub const SEQUENCE_STARTED_EVENT_TYPE: &str = "interaction.sequence_started";
pub const STEP_ENTERED_EVENT_TYPE: &str = "interaction.step_entered";
pub const DECISION_PRESENTED_EVENT_TYPE: &str = "interaction.decision_presented";
pub const OPTION_SELECTED_EVENT_TYPE: &str = "interaction.option_selected";
pub const SELECTION_CONFIRMED_EVENT_TYPE: &str = "interaction.selection_confirmed";
pub const ANSWER_ACCEPTED_EVENT_TYPE: &str = "interaction.answer_accepted";
pub const SELECTION_WITHDRAWN_EVENT_TYPE: &str = "interaction.selection_withdrawn";
pub const RESOLVED_FROM_RECORD_EVENT_TYPE: &str = "interaction.resolved_from_record";
pub const SESSION_CLOSED_EVENT_TYPE: &str = "interaction.session_closed";

/// The script started playing from step 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStarted {
    pub situation_index: usize,
    /// Schedule generation that owns playback from here on.
    pub generation: u64,
    /// False for the initial play when the situation opens.
    pub replay: bool,
}

/// A step took the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEntered {
    pub step: usize,
}

/// The script finished and the options are on offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPresented {
    pub situation_index: usize,
}

/// The player picked an option and is asked to confirm it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelected {
    pub option: usize,
}

/// The player confirmed the selected option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfirmed {
    pub option: usize,
    pub correct: bool,
}

/// First correct confirmation in this session; the host records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerAccepted {
    pub situation_index: usize,
    pub option: usize,
}

/// Why a selection was taken back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawReason {
    /// "No" on the confirmation prompt.
    Rejected,
    /// "Try again" after a wrong outcome.
    Retry,
}

/// The selection was cleared and the options are on offer again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionWithdrawn {
    pub option: usize,
    pub reason: WithdrawReason,
}

/// The situation opened with an answer already on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFromRecord {
    pub option: usize,
}

/// The situation's view was closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClosed {
    pub situation_index: usize,
}

/// Event payload variants for the conflict interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionEventKind {
    SequenceStarted(SequenceStarted),
    StepEntered(StepEntered),
    DecisionPresented(DecisionPresented),
    OptionSelected(OptionSelected),
    SelectionConfirmed(SelectionConfirmed),
    AnswerAccepted(AnswerAccepted),
    SelectionWithdrawn(SelectionWithdrawn),
    ResolvedFromRecord(ResolvedFromRecord),
    SessionClosed(SessionClosed),
}

impl InteractionEventKind {
    /// Routing name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SequenceStarted(_) => SEQUENCE_STARTED_EVENT_TYPE,
            Self::StepEntered(_) => STEP_ENTERED_EVENT_TYPE,
            Self::DecisionPresented(_) => DECISION_PRESENTED_EVENT_TYPE,
            Self::OptionSelected(_) => OPTION_SELECTED_EVENT_TYPE,
            Self::SelectionConfirmed(_) => SELECTION_CONFIRMED_EVENT_TYPE,
            Self::AnswerAccepted(_) => ANSWER_ACCEPTED_EVENT_TYPE,
            Self::SelectionWithdrawn(_) => SELECTION_WITHDRAWN_EVENT_TYPE,
            Self::ResolvedFromRecord(_) => RESOLVED_FROM_RECORD_EVENT_TYPE,
            Self::SessionClosed(_) => SESSION_CLOSED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the conflict interaction.
#[derive(Debug, Clone)]
pub struct InteractionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: InteractionEventKind,
}

impl DomainEvent for InteractionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("InteractionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
