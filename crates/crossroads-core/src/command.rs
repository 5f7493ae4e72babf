//! Player inputs addressed to an aggregate.

use uuid::Uuid;

/// An input such as opening a situation, confirming an option or
/// restarting the playthrough.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used in logs, e.g. `progress.record_answer`.
    fn command_type(&self) -> &'static str;

    /// Shared by every event the input causes.
    fn correlation_id(&self) -> Uuid;
}
