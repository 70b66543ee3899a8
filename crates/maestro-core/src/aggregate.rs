//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that record their changes as events and can be
/// rebuilt by replaying them.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the committed version (number of events already persisted).
    fn version(&self) -> i64;

    /// Apply a stored event to mutate internal state (used during replay).
    fn apply(&mut self, event: &Self::Event);

    /// Returns events recorded since the last commit.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Marks the recorded events as committed.
    fn clear_uncommitted_events(&mut self);

    /// Replays a slice of events in order.
    fn replay(&mut self, events: &[Self::Event]) {
        for event in events {
            self.apply(event);
        }
    }
}
