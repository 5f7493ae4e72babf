//! Completion reporting abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Message sent to the host when every situation has an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    /// Number of situations answered correctly.
    pub score: u32,
    /// Level the content bundle was authored for.
    pub level: u32,
    /// Number of situations in the bundle.
    pub situation_count: u32,
    /// SHA-256 fingerprint of the content the answers were given against.
    pub content_fingerprint: String,
}

/// Delivers completion reports to the host application.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// Report that the playthrough completed.
    async fn report_completion(&self, report: &CompletionReport) -> Result<(), DomainError>;
}
