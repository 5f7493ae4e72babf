//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No situation exists at the given index.
    #[error("situation not found: {0}")]
    SituationNotFound(usize),

    /// An interaction was requested while no situation is open.
    #[error("no situation is currently open")]
    NoActiveSession,

    /// A transition or input that is not legal in the current state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Game data that could not be parsed.
    #[error("content error: {0}")]
    Content(String),

    /// A collaborator outside the domain failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
