//! Production completion reporter.

use async_trait::async_trait;
use crossroads_core::error::DomainError;
use crossroads_core::report::{CompletionReport, ProgressReporter};
use tracing::info;

/// Emits completion reports as structured log records for the host to
/// collect.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

#[async_trait]
impl ProgressReporter for TracingReporter {
    async fn report_completion(&self, report: &CompletionReport) -> Result<(), DomainError> {
        let payload = serde_json::to_string(report)
            .map_err(|e| DomainError::Infrastructure(format!("report serialization failed: {e}")))?;
        info!(
            target: "crossroads::completion",
            score = report.score,
            level = report.level,
            situation_count = report.situation_count,
            content_fingerprint = %report.content_fingerprint,
            payload = %payload,
            "playthrough completion report"
        );
        Ok(())
    }
}
