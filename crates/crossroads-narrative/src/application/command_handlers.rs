//! Command handlers for the conflict interaction.
//!
//! Every handler drives the `ConflictSession` aggregate, drains its
//! uncommitted events and returns them to the host as an
//! [`InteractionOutcome`]. Inputs that are not legal in the current phase are
//! logged and produce an empty outcome; nothing reaches the caller as an
//! error.

use std::sync::Arc;

use crossroads_content::domain::bundle::ContentBundle;
use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::clock::Clock;
use crossroads_core::command::Command;
use crossroads_core::error::DomainError;
use crossroads_core::event::RecordedEvent;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::aggregates::ConflictSession;
use crate::domain::commands::{
    AdvanceTimeline, CloseSituation, ConfirmSelection, OpenSituation, RejectSelection,
    ReplaySequence, RetryDecision, SelectOption, SkipStep,
};
use crate::domain::events::{InteractionEvent, InteractionEventKind};

/// Sound the host should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Correct,
    Wrong,
}

/// What one interaction produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InteractionOutcome {
    pub events: Vec<RecordedEvent>,
    pub sound_cues: Vec<SoundCue>,
    /// Option accepted as the situation's answer by this interaction.
    pub answered: Option<usize>,
}

impl InteractionOutcome {
    /// Whether the interaction changed anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn from_events(events: &[InteractionEvent]) -> Self {
        let mut outcome = Self::default();
        for event in events {
            match &event.kind {
                InteractionEventKind::SelectionConfirmed(payload) => {
                    outcome.sound_cues.push(if payload.correct {
                        SoundCue::Correct
                    } else {
                        SoundCue::Wrong
                    });
                }
                InteractionEventKind::AnswerAccepted(payload) => {
                    outcome.answered = Some(payload.option);
                }
                _ => {}
            }
            outcome.events.push(RecordedEvent::from_event(event));
        }
        outcome
    }
}

fn drain(session: &mut ConflictSession) -> InteractionOutcome {
    InteractionOutcome::from_events(&session.take_uncommitted_events())
}

fn contain(
    command: &dyn Command,
    session: &mut ConflictSession,
    result: Result<(), DomainError>,
) -> InteractionOutcome {
    if let Err(err) = result {
        debug!(
            command_type = command.command_type(),
            correlation_id = %command.correlation_id(),
            phase = ?session.phase(),
            error = %err,
            "input ignored"
        );
        // A rejected transition records nothing, but drop anything stray.
        session.take_uncommitted_events();
        return InteractionOutcome::default();
    }
    drain(session)
}

/// Handles the `OpenSituation` command: builds a fresh session for the
/// situation and starts it.
///
/// # Errors
///
/// Returns `DomainError::SituationNotFound` if the bundle has no situation at
/// the index. This is host glue; the session itself never fails.
pub fn handle_open_situation(
    command: &OpenSituation,
    bundle: &ContentBundle,
    clock: &dyn Clock,
) -> Result<(ConflictSession, InteractionOutcome), DomainError> {
    let situation = bundle.situation(command.situation_index)?;
    let mut session = ConflictSession::open(
        Uuid::new_v4(),
        command.situation_index,
        Arc::clone(situation),
        Arc::clone(bundle.translations()),
        command.recorded_answer,
        command.correlation_id,
        clock,
    );
    let outcome = drain(&mut session);
    Ok((session, outcome))
}

/// Handles the `AdvanceTimeline` command.
pub fn handle_advance_timeline(
    command: &AdvanceTimeline,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.advance(command.elapsed_secs, command.correlation_id, clock);
    contain(command, session, result)
}

/// Handles the `SkipStep` command.
pub fn handle_skip_step(
    command: &SkipStep,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.skip_step(command.correlation_id, clock);
    contain(command, session, result)
}

/// Handles the `SelectOption` command.
pub fn handle_select_option(
    command: &SelectOption,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.select_option(command.option, command.correlation_id, clock);
    contain(command, session, result)
}

/// Handles the `ConfirmSelection` command.
pub fn handle_confirm_selection(
    command: &ConfirmSelection,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.confirm(command.correlation_id, clock);
    contain(command, session, result)
}

/// Handles the `RejectSelection` command.
pub fn handle_reject_selection(
    command: &RejectSelection,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.reject(command.correlation_id, clock);
    contain(command, session, result)
}

/// Handles the `RetryDecision` command.
pub fn handle_retry_decision(
    command: &RetryDecision,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.retry(command.correlation_id, clock);
    contain(command, session, result)
}

/// Handles the `ReplaySequence` command.
pub fn handle_replay_sequence(
    command: &ReplaySequence,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.replay(command.correlation_id, clock);
    contain(command, session, result)
}

/// Handles the `CloseSituation` command.
pub fn handle_close_situation(
    command: &CloseSituation,
    session: &mut ConflictSession,
    clock: &dyn Clock,
) -> InteractionOutcome {
    let result = session.close(command.correlation_id, clock);
    contain(command, session, result)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use crossroads_content::domain::bundle::ContentBundle;
    use crossroads_core::error::DomainError;
    use uuid::Uuid;

    use super::*;
    use crate::domain::aggregates::InteractionPhase;
    use crate::domain::events::{
        ANSWER_ACCEPTED_EVENT_TYPE, SELECTION_CONFIRMED_EVENT_TYPE, SEQUENCE_STARTED_EVENT_TYPE,
        STEP_ENTERED_EVENT_TYPE,
    };
    use crossroads_test_support::{FixedClock, fixtures};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn bundle() -> ContentBundle {
        ContentBundle::from_parts(
            vec![fixtures::scenario_situation()],
            fixtures::scenario_translations(),
            1,
        )
        .unwrap()
    }

    fn open(recorded_answer: Option<usize>) -> (ConflictSession, InteractionOutcome) {
        let command = OpenSituation {
            correlation_id: Uuid::new_v4(),
            situation_index: 0,
            recorded_answer,
        };
        handle_open_situation(&command, &bundle(), &clock()).unwrap()
    }

    fn finish_script(session: &mut ConflictSession) {
        let command = AdvanceTimeline {
            correlation_id: Uuid::new_v4(),
            elapsed_secs: 1_000.0,
        };
        handle_advance_timeline(&command, session, &clock());
    }

    fn select(session: &mut ConflictSession, option: usize) -> InteractionOutcome {
        let command = SelectOption {
            correlation_id: Uuid::new_v4(),
            option,
        };
        handle_select_option(&command, session, &clock())
    }

    fn confirm(session: &mut ConflictSession) -> InteractionOutcome {
        let command = ConfirmSelection {
            correlation_id: Uuid::new_v4(),
        };
        handle_confirm_selection(&command, session, &clock())
    }

    fn types(outcome: &InteractionOutcome) -> Vec<&str> {
        outcome
            .events
            .iter()
            .map(|event| event.event_type.as_str())
            .collect()
    }

    #[test]
    fn test_handle_open_situation_returns_opening_events() {
        // Act
        let (session, outcome) = open(None);

        // Assert
        assert_eq!(session.phase(), InteractionPhase::Presenting);
        assert_eq!(
            types(&outcome),
            vec![SEQUENCE_STARTED_EVENT_TYPE, STEP_ENTERED_EVENT_TYPE]
        );
        assert_eq!(outcome.events[0].sequence_number, 1);
        assert_eq!(outcome.events[0].payload["SequenceStarted"]["replay"], false);
        assert!(session.uncommitted_events().is_empty());
    }

    #[test]
    fn test_handle_open_situation_returns_not_found_for_unknown_index() {
        // Arrange
        let command = OpenSituation {
            correlation_id: Uuid::new_v4(),
            situation_index: 7,
            recorded_answer: None,
        };

        // Act
        let result = handle_open_situation(&command, &bundle(), &clock());

        // Assert
        match result {
            Err(DomainError::SituationNotFound(index)) => assert_eq!(index, 7),
            other => panic!("expected SituationNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_correct_yes_plays_success_cue_and_reports_answer() {
        // Arrange
        let (mut session, _) = open(None);
        finish_script(&mut session);
        select(&mut session, 1);

        // Act
        let outcome = confirm(&mut session);

        // Assert
        assert_eq!(outcome.sound_cues, vec![SoundCue::Correct]);
        assert_eq!(outcome.answered, Some(1));
        assert_eq!(
            types(&outcome),
            vec![SELECTION_CONFIRMED_EVENT_TYPE, ANSWER_ACCEPTED_EVENT_TYPE]
        );
    }

    #[test]
    fn test_wrong_yes_plays_failure_cue_without_answer() {
        // Arrange
        let (mut session, _) = open(None);
        finish_script(&mut session);
        select(&mut session, 0);

        // Act
        let outcome = confirm(&mut session);

        // Assert
        assert_eq!(outcome.sound_cues, vec![SoundCue::Wrong]);
        assert!(outcome.answered.is_none());
        assert_eq!(
            session.phase(),
            InteractionPhase::Resolved {
                option: 0,
                correct: false
            }
        );
    }

    #[test]
    fn test_illegal_input_yields_empty_outcome() {
        // Arrange
        let (mut session, _) = open(None);
        let version_before = session.version();

        // Act
        let outcome = confirm(&mut session);

        // Assert
        assert!(outcome.is_empty());
        assert!(outcome.sound_cues.is_empty());
        assert_eq!(session.version(), version_before);
        assert_eq!(session.phase(), InteractionPhase::Presenting);
    }

    #[test]
    fn test_retry_and_replay_handlers_drive_the_session() {
        // Arrange
        let (mut session, _) = open(None);
        finish_script(&mut session);
        select(&mut session, 0);
        confirm(&mut session);

        // Act
        let retry = handle_retry_decision(
            &RetryDecision {
                correlation_id: Uuid::new_v4(),
            },
            &mut session,
            &clock(),
        );
        let replay = handle_replay_sequence(
            &ReplaySequence {
                correlation_id: Uuid::new_v4(),
            },
            &mut session,
            &clock(),
        );

        // Assert
        assert!(!retry.is_empty());
        assert_eq!(types(&replay)[0], SEQUENCE_STARTED_EVENT_TYPE);
        assert_eq!(replay.events[0].payload["SequenceStarted"]["replay"], true);
        assert_eq!(session.phase(), InteractionPhase::Presenting);
    }

    #[test]
    fn test_skip_reject_and_close_handlers() {
        // Arrange
        let (mut session, _) = open(None);

        // Act
        let skipped = handle_skip_step(
            &SkipStep {
                correlation_id: Uuid::new_v4(),
            },
            &mut session,
            &clock(),
        );
        finish_script(&mut session);
        select(&mut session, 1);
        let rejected = handle_reject_selection(
            &RejectSelection {
                correlation_id: Uuid::new_v4(),
            },
            &mut session,
            &clock(),
        );
        let closed = handle_close_situation(
            &CloseSituation {
                correlation_id: Uuid::new_v4(),
            },
            &mut session,
            &clock(),
        );
        let after_close = confirm(&mut session);

        // Assert
        assert_eq!(types(&skipped), vec![STEP_ENTERED_EVENT_TYPE]);
        assert!(!rejected.is_empty());
        assert_eq!(closed.events.len(), 1);
        assert_eq!(session.phase(), InteractionPhase::Closed);
        assert!(after_close.is_empty());
    }

    #[test]
    fn test_recorded_answer_opens_resolved_without_cues() {
        let (session, outcome) = open(Some(1));

        assert_eq!(outcome.events.len(), 1);
        assert!(outcome.sound_cues.is_empty());
        assert!(outcome.answered.is_none());
        assert!(!session.is_playing_back());
    }
}
