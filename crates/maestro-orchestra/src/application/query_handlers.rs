//! Query handlers for the orchestra engine.

use chrono::{DateTime, Utc};
use maestro_core::error::DomainError;
use maestro_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::values::{Activity, Musician, Room};

/// Read-only view of an orchestra.
#[derive(Debug, Serialize)]
pub struct OrchestraView {
    pub orchestra_id: Uuid,
    pub name: String,
    pub budget: i64,
    pub experience: i64,
    pub practice_minutes: i64,
    pub required_practice_for_concert: i64,
    /// Roster, ordered by musician id.
    pub musicians: Vec<Musician>,
    pub practice_room: Room,
    /// Unused activities, ordered by activity id.
    pub unused_activities: Vec<Activity>,
    /// One entry per day.
    pub schedule: Vec<Option<Activity>>,
    /// Number of events in the stream.
    pub version: i64,
    /// When the latest event was recorded.
    pub updated_at: DateTime<Utc>,
}

/// Retrieves an orchestra by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_orchestra_by_id(
    orchestra_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<OrchestraView, DomainError> {
    let stored_events = repo.load_events(orchestra_id).await?;
    let Some(latest) = stored_events.last() else {
        return Err(DomainError::AggregateNotFound(orchestra_id));
    };
    let updated_at = latest.occurred_at;
    let orchestra = command_handlers::reconstitute(orchestra_id, &stored_events)?;

    Ok(OrchestraView {
        orchestra_id,
        name: orchestra.name().to_owned(),
        budget: orchestra.budget(),
        experience: orchestra.experience(),
        practice_minutes: orchestra.practice_minutes(),
        required_practice_for_concert: orchestra.required_practice_for_concert(),
        musicians: orchestra.musicians().values().cloned().collect(),
        practice_room: orchestra.practice_room().clone(),
        unused_activities: orchestra.unused_activities().values().cloned().collect(),
        schedule: orchestra.schedule().to_vec(),
        version: orchestra.version,
        updated_at,
    })
}
