//! Command handlers for the Session & Progress context.
//!
//! Handlers drive the `Playthrough` aggregate and drain its events. When an
//! answer completes the playthrough the completion report is passed to the
//! injected `ProgressReporter`; a reporter failure is logged, never returned.

use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::clock::Clock;
use crossroads_core::error::DomainError;
use crossroads_core::event::RecordedEvent;
use crossroads_core::report::{CompletionReport, ProgressReporter};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::aggregates::Playthrough;
use crate::domain::commands::{RecordAnswer, RestartPlaythrough};
use crate::domain::events::ProgressEventKind;

/// What one progress command produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressOutcome {
    pub events: Vec<RecordedEvent>,
    /// Completion report produced by this command, if any.
    pub report: Option<CompletionReport>,
    /// Whether the reporter accepted the report.
    pub report_delivered: bool,
}

/// Handles the `RecordAnswer` command: records the answer and, on
/// completion, reports to the host.
///
/// # Errors
///
/// Returns `DomainError::SituationNotFound` if the situation index is out of
/// range.
pub async fn handle_record_answer(
    command: &RecordAnswer,
    playthrough: &mut Playthrough,
    clock: &dyn Clock,
    reporter: &dyn ProgressReporter,
) -> Result<ProgressOutcome, DomainError> {
    playthrough.record_answer(
        command.situation_index,
        command.option,
        command.correlation_id,
        clock,
    )?;

    let events = playthrough.take_uncommitted_events();
    let completed = events
        .iter()
        .any(|event| matches!(event.kind, ProgressEventKind::PlaythroughCompleted(_)));

    let mut outcome = ProgressOutcome {
        events: events.iter().map(RecordedEvent::from_event).collect(),
        report: None,
        report_delivered: false,
    };

    let report = if completed {
        playthrough.completion_report()
    } else {
        None
    };
    if let Some(report) = report {
        match reporter.report_completion(&report).await {
            Ok(()) => {
                info!(
                    correlation_id = %command.correlation_id,
                    score = report.score,
                    level = report.level,
                    "completion reported"
                );
                outcome.report_delivered = true;
            }
            Err(err) => {
                warn!(
                    correlation_id = %command.correlation_id,
                    error = %err,
                    "completion report failed"
                );
            }
        }
        outcome.report = Some(report);
    }

    Ok(outcome)
}

/// Handles the `RestartPlaythrough` command.
pub fn handle_restart_playthrough(
    command: &RestartPlaythrough,
    playthrough: &mut Playthrough,
    clock: &dyn Clock,
) -> ProgressOutcome {
    playthrough.restart(command.correlation_id, clock);
    ProgressOutcome {
        events: playthrough
            .take_uncommitted_events()
            .iter()
            .map(RecordedEvent::from_event)
            .collect(),
        ..ProgressOutcome::default()
    }
}
