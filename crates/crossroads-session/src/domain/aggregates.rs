//! Aggregate roots for the Session & Progress context.

use crossroads_content::domain::bundle::ContentBundle;
use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::clock::Clock;
use crossroads_core::error::DomainError;
use crossroads_core::event::EventMetadata;
use crossroads_core::report::CompletionReport;
use tracing::{debug, info};
use uuid::Uuid;

use super::events::{
    AnswerRecorded, PlaythroughCompleted, PlaythroughRestarted, ProgressEvent, ProgressEventKind,
};

/// The aggregate root for one run through a content bundle.
///
/// Holds at most one answer per situation. An unanswered situation is `None`;
/// option 0 is an answer like any other.
#[derive(Debug)]
pub struct Playthrough {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    answers: Vec<Option<usize>>,
    level: u32,
    content_fingerprint: String,
    /// Uncommitted events pending collection by the host.
    uncommitted_events: Vec<ProgressEvent>,
}

impl Playthrough {
    /// Creates a playthrough with no answers.
    #[must_use]
    pub fn new(
        id: Uuid,
        situation_count: usize,
        level: u32,
        content_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            id,
            version: 0,
            answers: vec![None; situation_count],
            level,
            content_fingerprint: content_fingerprint.into(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates a playthrough sized to `bundle`.
    #[must_use]
    pub fn for_bundle(id: Uuid, bundle: &ContentBundle) -> Self {
        Self::new(id, bundle.len(), bundle.level(), bundle.fingerprint())
    }

    /// Records the accepted answer for a situation.
    ///
    /// A situation that already has an answer keeps it. Answering the last
    /// open situation also records completion.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SituationNotFound` if the index is out of range.
    pub fn record_answer(
        &mut self,
        situation_index: usize,
        option: usize,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let Some(slot) = self.answers.get(situation_index) else {
            return Err(DomainError::SituationNotFound(situation_index));
        };
        if let Some(existing) = slot {
            debug!(situation_index, existing, option, "answer already recorded");
            return Ok(());
        }

        self.record(
            ProgressEventKind::AnswerRecorded(AnswerRecorded {
                situation_index,
                option,
            }),
            correlation_id,
            clock,
        );

        if self.is_completed() {
            self.record(
                ProgressEventKind::PlaythroughCompleted(PlaythroughCompleted {
                    score: self.score(),
                    situation_count: self.situation_count_u32(),
                }),
                correlation_id,
                clock,
            );
            info!(
                playthrough_id = %self.id,
                score = self.score(),
                level = self.level,
                "playthrough completed"
            );
        }
        Ok(())
    }

    /// Clears every answer.
    pub fn restart(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        self.record(
            ProgressEventKind::PlaythroughRestarted(PlaythroughRestarted {
                cleared: self.answered_count(),
            }),
            correlation_id,
            clock,
        );
        info!(playthrough_id = %self.id, "playthrough restarted");
    }

    /// The answer on record for a situation.
    #[must_use]
    pub fn answer(&self, situation_index: usize) -> Option<usize> {
        self.answers.get(situation_index).copied().flatten()
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    #[must_use]
    pub fn situation_count(&self) -> usize {
        self.answers.len()
    }

    /// Number of situations answered correctly.
    #[must_use]
    pub fn score(&self) -> u32 {
        u32::try_from(self.answered_count()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn content_fingerprint(&self) -> &str {
        &self.content_fingerprint
    }

    /// Whether every situation has an answer. A bundle without situations
    /// never completes.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        !self.answers.is_empty() && self.answers.iter().all(Option::is_some)
    }

    /// The message for the host, once the playthrough is complete.
    #[must_use]
    pub fn completion_report(&self) -> Option<CompletionReport> {
        self.is_completed().then(|| CompletionReport {
            score: self.score(),
            level: self.level,
            situation_count: self.situation_count_u32(),
            content_fingerprint: self.content_fingerprint.clone(),
        })
    }

    fn situation_count_u32(&self) -> u32 {
        u32::try_from(self.answers.len()).unwrap_or(u32::MAX)
    }

    fn record(&mut self, kind: ProgressEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = ProgressEvent {
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
}

impl AggregateRoot for Playthrough {
    type Event = ProgressEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            ProgressEventKind::AnswerRecorded(payload) => {
                if let Some(slot) = self.answers.get_mut(payload.situation_index) {
                    *slot = Some(payload.option);
                }
            }
            ProgressEventKind::PlaythroughCompleted(_) => {}
            ProgressEventKind::PlaythroughRestarted(_) => {
                self.answers.fill(None);
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
