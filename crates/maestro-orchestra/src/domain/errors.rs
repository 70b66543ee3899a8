//! Rule violations raised by the orchestra engine.

use maestro_core::error::DomainError;
use thiserror::Error;
use uuid::Uuid;

/// Why an orchestra operation was rejected.
///
/// Every variant is raised before the aggregate changes, so a failed call
/// leaves the orchestra exactly as it was.
#[derive(Debug, Error)]
pub enum OrchestraError {
    #[error("insufficient funds: price {price} exceeds budget {budget}")]
    InsufficientFunds { price: i64, budget: i64 },

    #[error("insufficient experience: concert requires {required}, orchestra has {experience}")]
    InsufficientExperience { required: i64, experience: i64 },

    #[error("insufficient capacity: room holds {size}, orchestra has {musicians} musicians")]
    InsufficientCapacity { size: usize, musicians: usize },

    #[error("day {day} is outside the {schedule_size}-day schedule")]
    OutOfRange { day: usize, schedule_size: usize },

    #[error("activity {0} is not among the unused activities")]
    NotFound(Uuid),

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: i64 },

    #[error("{0} would overflow")]
    Overflow(&'static str),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
