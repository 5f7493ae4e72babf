//! Commands for the conflict interaction.

use crossroads_core::command::Command;
use uuid::Uuid;

macro_rules! impl_command {
    ($ty:ty, $name:literal) => {
        impl Command for $ty {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }
        }
    };
}

/// Command to open a situation's view and start its session.
#[derive(Debug, Clone)]
pub struct OpenSituation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Index of the situation in the content bundle.
    pub situation_index: usize,
    /// Correct answer already on record for this situation, if any.
    pub recorded_answer: Option<usize>,
}

/// Command to move the timeline forward by host animation time.
#[derive(Debug, Clone)]
pub struct AdvanceTimeline {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Seconds elapsed since the previous advance.
    pub elapsed_secs: f64,
}

/// Tap-to-advance: skip the rest of the current step.
#[derive(Debug, Clone)]
pub struct SkipStep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to pick one of the options.
#[derive(Debug, Clone)]
pub struct SelectOption {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Zero-based option index.
    pub option: usize,
}

/// "Yes" on the confirmation prompt.
#[derive(Debug, Clone)]
pub struct ConfirmSelection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// "No" on the confirmation prompt.
#[derive(Debug, Clone)]
pub struct RejectSelection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// "Try again" after a wrong outcome.
#[derive(Debug, Clone)]
pub struct RetryDecision {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to replay the script from step 0.
#[derive(Debug, Clone)]
pub struct ReplaySequence {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to close the situation's view.
#[derive(Debug, Clone)]
pub struct CloseSituation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(OpenSituation, "interaction.open_situation");
impl_command!(AdvanceTimeline, "interaction.advance_timeline");
impl_command!(SkipStep, "interaction.skip_step");
impl_command!(SelectOption, "interaction.select_option");
impl_command!(ConfirmSelection, "interaction.confirm_selection");
impl_command!(RejectSelection, "interaction.reject_selection");
impl_command!(RetryDecision, "interaction.retry_decision");
impl_command!(ReplaySequence, "interaction.replay_sequence");
impl_command!(CloseSituation, "interaction.close_situation");
