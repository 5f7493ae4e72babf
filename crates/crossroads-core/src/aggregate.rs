//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots whose state is the fold of their events.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events produced by command handling that the host has not
    /// collected yet.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Drains the uncommitted events, handing ownership to the caller.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
