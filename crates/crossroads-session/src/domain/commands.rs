//! Commands for the Session & Progress context.

use crossroads_core::command::Command;
use uuid::Uuid;

/// Command to record the accepted answer of a situation.
#[derive(Debug, Clone)]
pub struct RecordAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Index of the answered situation.
    pub situation_index: usize,
    /// The option that was accepted.
    pub option: usize,
}

impl Command for RecordAnswer {
    fn command_type(&self) -> &'static str {
        "progress.record_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to clear all answers and start over.
#[derive(Debug, Clone)]
pub struct RestartPlaythrough {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for RestartPlaythrough {
    fn command_type(&self) -> &'static str {
        "progress.restart_playthrough"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
