//! Aggregate root for one open conflict situation.
//!
//! The session owns the timeline player and everything the player's cues
//! touch, so a situation's view state has exactly one writer. Interaction
//! state changes are recorded as events and applied through
//! [`AggregateRoot::apply`]; purely visual cues (balloon fade, panel slide)
//! adjust the stage directly.

use std::sync::Arc;

use crossroads_content::domain::situation::{Situation, StepKind};
use crossroads_content::domain::translations::Translations;
use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::clock::Clock;
use crossroads_core::error::DomainError;
use crossroads_core::event::EventMetadata;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::{
    AnswerAccepted, DecisionPresented, InteractionEvent, InteractionEventKind, OptionSelected,
    ResolvedFromRecord, SelectionConfirmed, SelectionWithdrawn, SequenceStarted, SessionClosed,
    StepEntered, WithdrawReason,
};
use super::scene::{self, SceneOverride, SceneSource, VisibleScene};
use super::timeline::{Checkpoint, Cue, CueKind, TimelinePlayer};

/// Where the interaction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionPhase {
    /// The script is playing.
    Presenting,
    /// All options are on offer.
    AwaitingOption,
    /// An option was picked and awaits yes/no.
    AwaitingConfirmation { option: usize },
    /// The choice was confirmed and its outcome is shown.
    Resolved { option: usize, correct: bool },
    /// The view was closed; every further input is rejected.
    Closed,
}

/// Dialogue balloon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Balloon {
    pub visible: bool,
    /// Step whose text the balloon holds.
    pub step: Option<usize>,
    pub arrow_visible: bool,
    pub arrow_offset: Option<f32>,
}

/// Presentation state driven by the timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stage {
    pub balloon: Balloon,
    pub decision_panel_visible: bool,
    pub next_visible: bool,
}

impl Stage {
    fn presenting() -> Self {
        Self {
            balloon: Balloon {
                visible: true,
                ..Balloon::default()
            },
            decision_panel_visible: false,
            next_visible: true,
        }
    }

    fn deciding() -> Self {
        Self {
            balloon: Balloon::default(),
            decision_panel_visible: true,
            next_visible: false,
        }
    }
}

/// The aggregate root for one open situation.
#[derive(Debug)]
pub struct ConflictSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    situation_index: usize,
    situation: Arc<Situation>,
    translations: Arc<Translations>,
    pub(crate) phase: InteractionPhase,
    pub(crate) selected_option: Option<usize>,
    pub(crate) confirmed: bool,
    pub(crate) scene: VisibleScene,
    pub(crate) stage: Stage,
    /// Answer emitted in this session or on record at open time.
    pub(crate) answered: Option<usize>,
    player: TimelinePlayer,
    /// Uncommitted events pending collection by the host.
    uncommitted_events: Vec<InteractionEvent>,
}

impl ConflictSession {
    /// Opens a situation.
    ///
    /// Without a recorded answer the script starts playing from step 0. With
    /// one, the player is bypassed and the resolved outcome is shown at once.
    /// A recorded answer that names no option is treated as absent.
    #[must_use]
    pub fn open(
        id: Uuid,
        situation_index: usize,
        situation: Arc<Situation>,
        translations: Arc<Translations>,
        recorded_answer: Option<usize>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        let scene = scene::resolve(&situation.default_scene, None);
        let mut session = Self {
            id,
            version: 0,
            situation_index,
            situation,
            translations,
            phase: InteractionPhase::Presenting,
            selected_option: None,
            confirmed: false,
            scene,
            stage: Stage::presenting(),
            answered: None,
            player: TimelinePlayer::new(),
            uncommitted_events: Vec::new(),
        };

        match recorded_answer {
            Some(option) if option < session.situation.option_count() => {
                session.record(
                    InteractionEventKind::ResolvedFromRecord(ResolvedFromRecord { option }),
                    correlation_id,
                    clock,
                );
            }
            Some(option) => {
                warn!(
                    situation_index,
                    option, "recorded answer names no option, playing the script instead"
                );
                session.start_sequence(false, correlation_id, clock);
            }
            None => session.start_sequence(false, correlation_id, clock),
        }

        info!(
            session_id = %session.id,
            situation_index,
            phase = ?session.phase,
            "situation opened"
        );
        session
    }

    /// Moves the timeline forward by `elapsed_secs` of animation time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session is closed.
    pub fn advance(
        &mut self,
        elapsed_secs: f64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_open()?;
        let cues = self.player.advance(elapsed_secs);
        self.apply_cues(cues, correlation_id, clock);
        Ok(())
    }

    /// Skips the rest of the current step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless the script is playing.
    pub fn skip_step(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.phase != InteractionPhase::Presenting {
            return Err(DomainError::Validation(
                "steps can only be skipped while the script plays".to_owned(),
            ));
        }
        let cues = self.player.skip_to_next();
        self.apply_cues(cues, correlation_id, clock);
        Ok(())
    }

    /// Picks option `option` and asks for confirmation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if options are not on offer or the
    /// index names no option.
    pub fn select_option(
        &mut self,
        option: usize,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != InteractionPhase::AwaitingOption {
            return Err(DomainError::Validation(
                "options are not on offer".to_owned(),
            ));
        }
        if option >= self.situation.option_count() {
            return Err(DomainError::Validation(format!(
                "option {option} does not exist"
            )));
        }
        self.record(
            InteractionEventKind::OptionSelected(OptionSelected { option }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// "Yes": confirms the selected option and resolves its outcome.
    ///
    /// The first correct confirmation of the session also records an
    /// `AnswerAccepted` event; later ones never do.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless a confirmation is pending.
    pub fn confirm(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        let InteractionPhase::AwaitingConfirmation { option } = self.phase else {
            return Err(DomainError::Validation(
                "no selection awaits confirmation".to_owned(),
            ));
        };
        let correct = self
            .situation
            .reaction_for(option)
            .is_some_and(|reaction| reaction.correct);

        self.record(
            InteractionEventKind::SelectionConfirmed(SelectionConfirmed { option, correct }),
            correlation_id,
            clock,
        );

        if correct && self.answered.is_none() {
            self.record(
                InteractionEventKind::AnswerAccepted(AnswerAccepted {
                    situation_index: self.situation_index,
                    option,
                }),
                correlation_id,
                clock,
            );
            info!(
                session_id = %self.id,
                situation_index = self.situation_index,
                option,
                "answer accepted"
            );
        }
        Ok(())
    }

    /// "No": withdraws the selection and shows the options again without
    /// replaying the script.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless a confirmation is pending.
    pub fn reject(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        let InteractionPhase::AwaitingConfirmation { option } = self.phase else {
            return Err(DomainError::Validation(
                "no selection awaits confirmation".to_owned(),
            ));
        };
        self.withdraw(option, WithdrawReason::Rejected, correlation_id, clock);
        Ok(())
    }

    /// "Try again" after a wrong outcome; behaves exactly like [`Self::reject`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless a wrong outcome is shown.
    pub fn retry(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        let InteractionPhase::Resolved {
            option,
            correct: false,
        } = self.phase
        else {
            return Err(DomainError::Validation(
                "only a wrong outcome can be retried".to_owned(),
            ));
        };
        self.withdraw(option, WithdrawReason::Retry, correlation_id, clock);
        Ok(())
    }

    /// Restores the default scene, clears the selection and restarts the
    /// script from step 0, cancelling any schedule still in flight.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session is closed.
    pub fn replay(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.start_sequence(true, correlation_id, clock);
        Ok(())
    }

    /// Closes the view and cancels pending playback.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session is already closed.
    pub fn close(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.player.cancel();
        self.record(
            InteractionEventKind::SessionClosed(SessionClosed {
                situation_index: self.situation_index,
            }),
            correlation_id,
            clock,
        );
        info!(session_id = %self.id, situation_index = self.situation_index, "situation closed");
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    #[must_use]
    pub fn scene(&self) -> &VisibleScene {
        &self.scene
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Answer accepted in this session or on record when it opened.
    #[must_use]
    pub fn answered(&self) -> Option<usize> {
        self.answered
    }

    #[must_use]
    pub fn situation_index(&self) -> usize {
        self.situation_index
    }

    #[must_use]
    pub fn situation(&self) -> &Situation {
        &self.situation
    }

    #[must_use]
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Current timeline checkpoint; `None` when playback was bypassed or
    /// cancelled.
    #[must_use]
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        self.player.current_checkpoint()
    }

    /// Fraction of a step's text revealed so far.
    #[must_use]
    pub fn reveal_progress(&self, step: usize) -> f64 {
        self.player.reveal_progress(step)
    }

    /// Whether a playback schedule exists.
    #[must_use]
    pub fn is_playing_back(&self) -> bool {
        self.player.is_live()
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.phase == InteractionPhase::Closed {
            return Err(DomainError::Validation("session is closed".to_owned()));
        }
        Ok(())
    }

    fn start_sequence(&mut self, replay: bool, correlation_id: Uuid, clock: &dyn Clock) {
        let cues = self
            .player
            .start(&self.situation.sequence, &self.translations);
        self.record(
            InteractionEventKind::SequenceStarted(SequenceStarted {
                situation_index: self.situation_index,
                generation: self.player.generation().value(),
                replay,
            }),
            correlation_id,
            clock,
        );
        self.apply_cues(cues, correlation_id, clock);
    }

    fn withdraw(
        &mut self,
        option: usize,
        reason: WithdrawReason,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        self.record(
            InteractionEventKind::SelectionWithdrawn(SelectionWithdrawn { option, reason }),
            correlation_id,
            clock,
        );
        let cues = self.player.seek_to_end();
        self.apply_cues(cues, correlation_id, clock);
    }

    pub(crate) fn apply_cues(&mut self, cues: Vec<Cue>, correlation_id: Uuid, clock: &dyn Clock) {
        for cue in cues {
            if !self.player.accepts(&cue) {
                debug!(
                    generation = cue.generation.value(),
                    live = self.player.generation().value(),
                    "discarding stale timeline cue"
                );
                continue;
            }
            match cue.kind {
                CueKind::StepStarted(step) => self.record(
                    InteractionEventKind::StepEntered(StepEntered { step }),
                    correlation_id,
                    clock,
                ),
                CueKind::BalloonHidden => {
                    self.stage.balloon.visible = false;
                    self.stage.balloon.arrow_visible = false;
                }
                CueKind::DecisionPanelRevealed => {
                    self.stage.decision_panel_visible = true;
                    self.stage.next_visible = false;
                    self.stage.balloon.arrow_visible = false;
                }
                CueKind::Completed => {
                    if self.phase == InteractionPhase::Presenting {
                        self.record(
                            InteractionEventKind::DecisionPresented(DecisionPresented {
                                situation_index: self.situation_index,
                            }),
                            correlation_id,
                            clock,
                        );
                    }
                }
            }
        }
    }

    fn record(&mut self, kind: InteractionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = InteractionEvent {
            metadata: EventMetadata::caused_by_command(
                kind.event_type(),
                self.id,
                self.version + 1,
                correlation_id,
                clock,
            ),
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn enter_step(&mut self, index: usize) {
        let Some(step) = self.situation.sequence.get(index) else {
            return;
        };
        if let Some(elements) = &step.scene_override {
            self.scene = scene::resolve(
                &self.situation.default_scene,
                Some(SceneOverride {
                    source: SceneSource::Step(index),
                    elements,
                }),
            );
        }
        let balloon = &mut self.stage.balloon;
        balloon.arrow_visible = step.kind == StepKind::Speech;
        if step.kind.has_text() {
            balloon.visible = true;
            balloon.step = Some(index);
            if let Some(offset) = step.arrow_offset {
                balloon.arrow_offset = Some(offset);
            }
        }
    }

    fn reaction_scene(&self, option: usize) -> VisibleScene {
        let active = self
            .situation
            .reaction_for(option)
            .map(|reaction| SceneOverride {
                source: SceneSource::Reaction(option),
                elements: &reaction.scene,
            });
        scene::resolve(&self.situation.default_scene, active)
    }

    fn default_scene(&self) -> VisibleScene {
        scene::resolve(&self.situation.default_scene, None)
    }
}

impl AggregateRoot for ConflictSession {
    type Event = InteractionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            InteractionEventKind::SequenceStarted(_) => {
                self.phase = InteractionPhase::Presenting;
                self.selected_option = None;
                self.confirmed = false;
                self.scene = self.default_scene();
                self.stage = Stage::presenting();
            }
            InteractionEventKind::StepEntered(payload) => self.enter_step(payload.step),
            InteractionEventKind::DecisionPresented(_) => {
                self.phase = InteractionPhase::AwaitingOption;
                self.stage = Stage::deciding();
            }
            InteractionEventKind::OptionSelected(payload) => {
                self.selected_option = Some(payload.option);
                self.phase = InteractionPhase::AwaitingConfirmation {
                    option: payload.option,
                };
            }
            InteractionEventKind::SelectionConfirmed(payload) => {
                self.confirmed = true;
                self.scene = self.reaction_scene(payload.option);
                self.phase = InteractionPhase::Resolved {
                    option: payload.option,
                    correct: payload.correct,
                };
            }
            InteractionEventKind::AnswerAccepted(payload) => {
                self.answered = Some(payload.option);
            }
            InteractionEventKind::SelectionWithdrawn(_) => {
                self.selected_option = None;
                self.confirmed = false;
                self.scene = self.default_scene();
                self.phase = InteractionPhase::AwaitingOption;
                self.stage = Stage::deciding();
            }
            InteractionEventKind::ResolvedFromRecord(payload) => {
                let correct = self
                    .situation
                    .reaction_for(payload.option)
                    .is_some_and(|reaction| reaction.correct);
                self.selected_option = Some(payload.option);
                self.confirmed = true;
                self.answered = Some(payload.option);
                self.scene = self.reaction_scene(payload.option);
                self.phase = InteractionPhase::Resolved {
                    option: payload.option,
                    correct,
                };
                self.stage = Stage::deciding();
            }
            InteractionEventKind::SessionClosed(_) => {
                self.phase = InteractionPhase::Closed;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crossroads_core::event::DomainEvent;
    use crossroads_test_support::{FixedClock, fixtures};

    use crate::domain::events::{
        ANSWER_ACCEPTED_EVENT_TYPE, SELECTION_CONFIRMED_EVENT_TYPE, SEQUENCE_STARTED_EVENT_TYPE,
        STEP_ENTERED_EVENT_TYPE,
    };
    use crate::domain::timeline::Generation;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn open(recorded_answer: Option<usize>) -> ConflictSession {
        ConflictSession::open(
            Uuid::new_v4(),
            0,
            Arc::new(fixtures::scenario_situation()),
            Arc::new(fixtures::scenario_translations()),
            recorded_answer,
            Uuid::new_v4(),
            &clock(),
        )
    }

    fn open_at_decision() -> ConflictSession {
        let mut session = open(None);
        session.advance(1_000.0, Uuid::new_v4(), &clock()).unwrap();
        session.take_uncommitted_events();
        session
    }

    fn event_types(events: &[InteractionEvent]) -> Vec<&'static str> {
        events.iter().map(DomainEvent::event_type).collect()
    }

    #[test]
    fn test_open_starts_the_script_from_step_zero() {
        // Act
        let session = open(None);

        // Assert
        assert_eq!(session.phase(), InteractionPhase::Presenting);
        assert_eq!(session.checkpoint(), Some(Checkpoint::Step(0)));
        assert_eq!(session.scene().source, SceneSource::Default);
        assert_eq!(
            event_types(session.uncommitted_events()),
            vec![SEQUENCE_STARTED_EVENT_TYPE, STEP_ENTERED_EVENT_TYPE]
        );
        assert_eq!(session.stage().balloon.step, Some(0));
        assert!(!session.stage().decision_panel_visible);
    }

    #[test]
    fn test_events_carry_sequential_metadata() {
        // Arrange
        let session_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        // Act
        let session = ConflictSession::open(
            session_id,
            0,
            Arc::new(fixtures::scenario_situation()),
            Arc::new(fixtures::scenario_translations()),
            None,
            correlation_id,
            &clock(),
        );

        // Assert
        for (i, event) in session.uncommitted_events().iter().enumerate() {
            let meta = event.metadata();
            assert_eq!(meta.aggregate_id, session_id);
            assert_eq!(meta.sequence_number, i64::try_from(i).unwrap() + 1);
            assert_eq!(meta.correlation_id, correlation_id);
            assert_eq!(meta.causation_id, correlation_id);
            assert_eq!(meta.occurred_at, clock().0);
        }
        assert_eq!(session.version(), 2);
    }

    #[test]
    fn test_script_completion_offers_the_options() {
        let session = open_at_decision();

        assert_eq!(session.phase(), InteractionPhase::AwaitingOption);
        assert_eq!(session.checkpoint(), Some(Checkpoint::End));
        assert!(session.stage().decision_panel_visible);
        assert!(!session.stage().balloon.visible);
        assert!(!session.stage().next_visible);
    }

    #[test]
    fn test_speech_step_shows_arrow_and_caption_hides_it() {
        // Arrange
        let mut session = open(None);
        assert!(!session.stage().balloon.arrow_visible);

        // Act
        session.skip_step(Uuid::new_v4(), &clock()).unwrap();

        // Assert
        assert!(session.stage().balloon.arrow_visible);
        assert_eq!(session.stage().balloon.step, Some(1));
        assert_eq!(session.stage().balloon.arrow_offset, Some(25.0));
    }

    #[test]
    fn test_correct_confirmation_emits_answer_once() {
        // Arrange
        let mut session = open_at_decision();

        // Act
        session.select_option(1, Uuid::new_v4(), &clock()).unwrap();
        session.confirm(Uuid::new_v4(), &clock()).unwrap();

        // Assert
        let events = session.take_uncommitted_events();
        let accepted: Vec<_> = events
            .iter()
            .filter_map(|event| match &event.kind {
                InteractionEventKind::AnswerAccepted(payload) => Some(payload.option),
                _ => None,
            })
            .collect();
        assert_eq!(accepted, vec![1]);
        assert!(events.iter().any(|event| event.kind
            == InteractionEventKind::SelectionConfirmed(SelectionConfirmed {
                option: 1,
                correct: true
            })));
        assert_eq!(
            session.phase(),
            InteractionPhase::Resolved {
                option: 1,
                correct: true
            }
        );
        assert_eq!(session.answered(), Some(1));
        assert_eq!(session.scene().source, SceneSource::Reaction(1));
        assert_eq!(
            session.scene().elements,
            fixtures::scenario_situation().reactions[1].scene
        );
    }

    #[test]
    fn test_wrong_confirmation_then_retry_returns_to_options_without_replay() {
        // Arrange
        let mut session = open_at_decision();
        session.select_option(0, Uuid::new_v4(), &clock()).unwrap();

        // Act
        session.confirm(Uuid::new_v4(), &clock()).unwrap();
        let confirm_events = session.take_uncommitted_events();
        session.retry(Uuid::new_v4(), &clock()).unwrap();
        let retry_events = session.take_uncommitted_events();

        // Assert
        assert_eq!(
            event_types(&confirm_events),
            vec![SELECTION_CONFIRMED_EVENT_TYPE]
        );
        assert!(session.answered().is_none());
        assert_eq!(session.phase(), InteractionPhase::AwaitingOption);
        assert!(session.selected_option().is_none());
        assert!(!session.is_confirmed());
        assert_eq!(session.scene().source, SceneSource::Default);
        assert!(
            !event_types(&retry_events).contains(&SEQUENCE_STARTED_EVENT_TYPE),
            "retry must not replay the script"
        );
        assert_eq!(session.checkpoint(), Some(Checkpoint::End));
    }

    #[test]
    fn test_reject_restores_base_scene_without_replay() {
        // Arrange
        let mut session = open_at_decision();
        session.select_option(1, Uuid::new_v4(), &clock()).unwrap();

        // Act
        session.reject(Uuid::new_v4(), &clock()).unwrap();

        // Assert
        let events = session.take_uncommitted_events();
        assert_eq!(session.phase(), InteractionPhase::AwaitingOption);
        assert!(session.selected_option().is_none());
        assert_eq!(session.scene().source, SceneSource::Default);
        assert!(session.stage().decision_panel_visible);
        assert!(events.iter().any(|event| matches!(
            &event.kind,
            InteractionEventKind::SelectionWithdrawn(SelectionWithdrawn {
                reason: WithdrawReason::Rejected,
                ..
            })
        )));
        assert!(!event_types(&events).contains(&SEQUENCE_STARTED_EVENT_TYPE));
    }

    #[test]
    fn test_replay_always_resets_selection_and_scene() {
        let mut session = open_at_decision();

        for option in [0, 1, 0] {
            // Arrange
            session.advance(1_000.0, Uuid::new_v4(), &clock()).unwrap();
            session.select_option(option, Uuid::new_v4(), &clock()).unwrap();
            session.confirm(Uuid::new_v4(), &clock()).unwrap();

            // Act
            session.replay(Uuid::new_v4(), &clock()).unwrap();

            // Assert
            assert_eq!(session.phase(), InteractionPhase::Presenting);
            assert!(session.selected_option().is_none());
            assert!(!session.is_confirmed());
            assert_eq!(session.scene().source, SceneSource::Default);
            assert_eq!(
                session.scene().elements,
                fixtures::scenario_situation().default_scene
            );
            assert_eq!(session.checkpoint(), Some(Checkpoint::Step(0)));
        }
    }

    #[test]
    fn test_answer_is_not_emitted_again_after_replay() {
        // Arrange
        let mut session = open_at_decision();
        session.select_option(1, Uuid::new_v4(), &clock()).unwrap();
        session.confirm(Uuid::new_v4(), &clock()).unwrap();
        session.replay(Uuid::new_v4(), &clock()).unwrap();
        session.advance(1_000.0, Uuid::new_v4(), &clock()).unwrap();
        session.take_uncommitted_events();

        // Act
        session.select_option(1, Uuid::new_v4(), &clock()).unwrap();
        session.confirm(Uuid::new_v4(), &clock()).unwrap();

        // Assert
        let events = session.take_uncommitted_events();
        assert!(!event_types(&events).contains(&ANSWER_ACCEPTED_EVENT_TYPE));
    }

    #[test]
    fn test_recorded_answer_bypasses_playback() {
        // Act
        let session = open(Some(1));

        // Assert
        assert_eq!(
            session.phase(),
            InteractionPhase::Resolved {
                option: 1,
                correct: true
            }
        );
        assert!(!session.is_playing_back());
        assert!(session.checkpoint().is_none());
        assert!(session.stage().decision_panel_visible);
        assert!(!session.stage().balloon.visible);
        assert_eq!(session.scene().source, SceneSource::Reaction(1));
        assert_eq!(session.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_recorded_answer_zero_is_an_answer() {
        let session = open(Some(0));

        assert_eq!(session.selected_option(), Some(0));
        assert_eq!(session.answered(), Some(0));
        assert!(!session.is_playing_back());
    }

    #[test]
    fn test_recorded_answer_out_of_range_plays_the_script() {
        let session = open(Some(9));

        assert_eq!(session.phase(), InteractionPhase::Presenting);
        assert!(session.answered().is_none());
    }

    #[test]
    fn test_selecting_while_presenting_is_rejected() {
        let mut session = open(None);
        session.take_uncommitted_events();

        let result = session.select_option(0, Uuid::new_v4(), &clock());

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(session.uncommitted_events().is_empty());
    }

    #[test]
    fn test_selecting_unknown_option_is_rejected() {
        let mut session = open_at_decision();

        let result = session.select_option(2, Uuid::new_v4(), &clock());

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(session.phase(), InteractionPhase::AwaitingOption);
    }

    #[test]
    fn test_confirm_after_resolution_is_rejected() {
        let mut session = open_at_decision();
        session.select_option(1, Uuid::new_v4(), &clock()).unwrap();
        session.confirm(Uuid::new_v4(), &clock()).unwrap();

        let result = session.confirm(Uuid::new_v4(), &clock());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_retry_after_correct_outcome_is_rejected() {
        let mut session = open(Some(1));

        assert!(session.retry(Uuid::new_v4(), &clock()).is_err());
    }

    #[test]
    fn test_step_scene_override_persists_until_replay() {
        // Arrange
        let situation = fixtures::three_step_situation();
        let mut session = ConflictSession::open(
            Uuid::new_v4(),
            2,
            Arc::new(situation.clone()),
            Arc::new(fixtures::scenario_translations()),
            None,
            Uuid::new_v4(),
            &clock(),
        );

        // Act
        session.skip_step(Uuid::new_v4(), &clock()).unwrap();
        session.skip_step(Uuid::new_v4(), &clock()).unwrap();

        // Assert
        assert_eq!(session.scene().source, SceneSource::Step(1));
        assert_eq!(
            Some(&session.scene().elements),
            situation.sequence[1].scene_override.as_ref()
        );

        session.replay(Uuid::new_v4(), &clock()).unwrap();
        assert_eq!(session.scene().source, SceneSource::Default);
    }

    #[test]
    fn test_stale_cue_from_cancelled_schedule_is_ignored() {
        // Arrange
        let mut session = open(None);
        let stale = Cue {
            generation: session.player.generation(),
            at: 0.0,
            kind: CueKind::StepStarted(1),
        };
        session.replay(Uuid::new_v4(), &clock()).unwrap();
        session.take_uncommitted_events();

        // Act
        session.apply_cues(vec![stale], Uuid::new_v4(), &clock());

        // Assert
        assert!(session.uncommitted_events().is_empty());
        assert_eq!(session.stage().balloon.step, Some(0));
        assert!(stale.generation < session.player.generation());
        assert_ne!(session.player.generation(), Generation::default());
    }

    #[test]
    fn test_replay_mid_script_restarts_from_step_zero() {
        let mut session = open(None);
        session.skip_step(Uuid::new_v4(), &clock()).unwrap();

        session.replay(Uuid::new_v4(), &clock()).unwrap();

        assert_eq!(session.checkpoint(), Some(Checkpoint::Step(0)));
        assert_eq!(session.stage().balloon.step, Some(0));
    }

    #[test]
    fn test_close_cancels_playback_and_rejects_input() {
        // Arrange
        let mut session = open(None);

        // Act
        session.close(Uuid::new_v4(), &clock()).unwrap();

        // Assert
        assert_eq!(session.phase(), InteractionPhase::Closed);
        assert!(!session.is_playing_back());
        assert!(session.advance(1.0, Uuid::new_v4(), &clock()).is_err());
        assert!(session.replay(Uuid::new_v4(), &clock()).is_err());
        assert!(session.close(Uuid::new_v4(), &clock()).is_err());
    }

    fn open_sequence(kinds: &[StepKind]) -> ConflictSession {
        let mut situation = fixtures::scenario_situation();
        situation.sequence = kinds
            .iter()
            .map(|&kind| match kind {
                StepKind::Image => fixtures::step(kind, "flashback"),
                _ => fixtures::step(kind, "b"),
            })
            .collect();
        ConflictSession::open(
            Uuid::new_v4(),
            0,
            Arc::new(situation),
            Arc::new(fixtures::scenario_translations()),
            None,
            Uuid::new_v4(),
            &clock(),
        )
    }

    #[test]
    fn test_image_step_fades_balloon_until_next_text_step() {
        // Arrange
        let mut session = open_sequence(&[
            StepKind::Speech,
            StepKind::Image,
            StepKind::Image,
            StepKind::Speech,
        ]);
        assert!(session.stage().balloon.visible);
        assert!(session.stage().balloon.arrow_visible);

        // Act: enter the first image step.
        session.skip_step(Uuid::new_v4(), &clock()).unwrap();

        // Assert: the earlier speech is still fading out, without its arrow.
        assert_eq!(session.checkpoint(), Some(Checkpoint::Step(1)));
        assert!(session.stage().balloon.visible);
        assert_eq!(session.stage().balloon.step, Some(0));
        assert!(!session.stage().balloon.arrow_visible);

        // Act: let the image fade run out into the second image step.
        session.advance(0.25, Uuid::new_v4(), &clock()).unwrap();

        // Assert
        assert_eq!(session.checkpoint(), Some(Checkpoint::Step(2)));
        assert!(!session.stage().balloon.visible);
        assert!(!session.stage().balloon.arrow_visible);

        // Act: the second fade ends where the closing speech starts.
        session.advance(0.25, Uuid::new_v4(), &clock()).unwrap();

        // Assert
        assert_eq!(session.checkpoint(), Some(Checkpoint::Step(3)));
        assert!(session.stage().balloon.visible);
        assert_eq!(session.stage().balloon.step, Some(3));
        assert!(session.stage().balloon.arrow_visible);
        assert!(!session.stage().decision_panel_visible);
    }

    #[test]
    fn test_text_step_after_image_shows_balloon_again() {
        // Arrange
        let mut session =
            open_sequence(&[StepKind::Speech, StepKind::Image, StepKind::Speech]);
        session.skip_step(Uuid::new_v4(), &clock()).unwrap();

        // Act
        session.advance(0.25, Uuid::new_v4(), &clock()).unwrap();

        // Assert
        assert_eq!(session.checkpoint(), Some(Checkpoint::Step(2)));
        assert!(session.stage().balloon.visible);
        assert_eq!(session.stage().balloon.step, Some(2));
        assert!(session.stage().balloon.arrow_visible);
        assert_eq!(session.phase(), InteractionPhase::Presenting);
    }
}
