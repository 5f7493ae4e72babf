//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for routing on the host side.
    pub event_type: String,
    /// Aggregate this event belongs to.
    pub aggregate_id: Uuid,
    /// Monotonically increasing version within the aggregate stream.
    pub sequence_number: i64,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Causation ID linking this event to the command that caused it.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata for an event caused directly by a command.
    #[must_use]
    pub fn caused_by_command(
        event_type: &str,
        aggregate_id: Uuid,
        sequence_number: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number,
            correlation_id,
            causation_id: correlation_id,
            occurred_at: clock.now(),
        }
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}

/// A drained domain event in host-facing form.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for routing on the host side.
    pub event_type: String,
    /// Sequence number within the aggregate stream.
    pub sequence_number: i64,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
    /// Serialized event payload.
    pub payload: serde_json::Value,
}

impl RecordedEvent {
    /// Converts a domain event into its host-facing form.
    #[must_use]
    pub fn from_event<E: DomainEvent>(event: &E) -> Self {
        let meta = event.metadata();
        Self {
            event_id: meta.event_id,
            event_type: event.event_type().to_owned(),
            sequence_number: meta.sequence_number,
            correlation_id: meta.correlation_id,
            occurred_at: meta.occurred_at,
            payload: event.to_payload(),
        }
    }
}
