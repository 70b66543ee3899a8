//! Domain error types shared by every aggregate.

use thiserror::Error;
use uuid::Uuid;

/// Errors that are not specific to one aggregate's rules.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No events exist for the requested aggregate.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The version the writer loaded.
        expected: i64,
        /// The version found in the store.
        actual: i64,
    },

    /// Input rejected before it reached the aggregate.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage or deserialization failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
