//! Test reporters — mock `ProgressReporter` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use crossroads_core::error::DomainError;
use crossroads_core::report::{CompletionReport, ProgressReporter};

/// A reporter that records every completion report it receives.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<CompletionReport>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all reports received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reports(&self) -> Vec<CompletionReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressReporter for RecordingReporter {
    async fn report_completion(&self, report: &CompletionReport) -> Result<(), DomainError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// A reporter that always fails with an infrastructure error. Useful for
/// testing that delivery failures stay contained.
#[derive(Debug)]
pub struct FailingReporter;

#[async_trait]
impl ProgressReporter for FailingReporter {
    async fn report_completion(&self, _report: &CompletionReport) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("host unreachable".into()))
    }
}
