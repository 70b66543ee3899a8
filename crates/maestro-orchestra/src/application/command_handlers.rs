//! Command handlers for the orchestra engine.
//!
//! Each handler loads the orchestra's event stream, rebuilds the aggregate,
//! runs one operation and appends the resulting events at the version it
//! loaded. A concurrent writer makes the append fail as a whole, so the
//! orchestra is the single unit of consistency.

use maestro_core::aggregate::AggregateRoot;
use maestro_core::clock::Clock;
use maestro_core::command::Command;
use maestro_core::error::DomainError;
use maestro_core::event::{DomainEvent, EventMetadata};
use maestro_core::repository::{EventRepository, StoredEvent};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::OrchestraConfig;
use crate::domain::aggregates::Orchestra;
use crate::domain::commands::{
    BuyConcert, BuyMusician, BuyPractice, BuyPracticeRoom, BuyTrip, FoundOrchestra,
    FreeScheduleSlot, RenameOrchestra, RunScheduledWeek, UpdateSchedule,
};
use crate::domain::errors::OrchestraError;
use crate::domain::events::{OrchestraEvent, OrchestraEventKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct OrchestraCommandResult {
    /// The orchestra affected by the command.
    pub aggregate_id: Uuid,
    /// The events produced and persisted. Empty when the command was a
    /// no-op.
    pub stored_events: Vec<StoredEvent>,
}

fn to_stored_event(event: &OrchestraEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Reconstitutes an `Orchestra` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    orchestra_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Orchestra, DomainError> {
    let mut orchestra = Orchestra::new(orchestra_id);
    for stored in existing_events {
        let kind: OrchestraEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = OrchestraEvent {
            metadata: EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                causation_id: stored.causation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        orchestra.apply(&event);
    }
    Ok(orchestra)
}

async fn load(orchestra_id: Uuid, repo: &dyn EventRepository) -> Result<Orchestra, OrchestraError> {
    let existing_events = repo.load_events(orchestra_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(orchestra_id).into());
    }
    Ok(reconstitute(orchestra_id, &existing_events)?)
}

async fn commit(
    command: &impl Command,
    mut orchestra: Orchestra,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let stored_events: Vec<StoredEvent> = orchestra
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    if !stored_events.is_empty() {
        repo.append_events(orchestra.id, orchestra.version(), &stored_events)
            .await?;
        orchestra.clear_uncommitted_events();
    }

    info!(
        command_type = command.command_type(),
        orchestra_id = %command.aggregate_id(),
        events = stored_events.len(),
        version = orchestra.version(),
        "command handled"
    );

    Ok(OrchestraCommandResult {
        aggregate_id: orchestra.id,
        stored_events,
    })
}

/// Handles the `FoundOrchestra` command: creates the aggregate from
/// `config` and persists the founding event.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is blank or `config` is
/// invalid, or any error from appending (a `ConcurrencyConflict` if the
/// orchestra already exists).
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_found_orchestra(
    command: &FoundOrchestra,
    config: &OrchestraConfig,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    if command.name.trim().is_empty() {
        return Err(DomainError::Validation("orchestra name must not be empty".into()).into());
    }
    config
        .validate()
        .map_err(|e| DomainError::Validation(e.to_string()))?;

    let orchestra = Orchestra::found(
        command.orchestra_id,
        command.name.clone(),
        command.musicians.clone(),
        command.unused_activities.clone(),
        config,
        command.correlation_id,
        clock,
    );

    commit(command, orchestra, repo).await
}

/// Handles the `RenameOrchestra` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is blank, or any error
/// from loading or appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_rename_orchestra(
    command: &RenameOrchestra,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    if command.name.trim().is_empty() {
        return Err(DomainError::Validation("orchestra name must not be empty".into()).into());
    }

    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.rename(command.name.clone(), command.correlation_id, clock);
    commit(command, orchestra, repo).await
}

/// Handles the `BuyMusician` command.
///
/// # Errors
///
/// Returns `OrchestraError::NegativeAmount` or `OrchestraError::Overflow`,
/// or any error from loading or appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_buy_musician(
    command: &BuyMusician,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.buy_musician(command.musician.clone(), command.correlation_id, clock)?;
    commit(command, orchestra, repo).await
}

/// Handles the `BuyPractice` command.
///
/// # Errors
///
/// Returns `OrchestraError::NegativeAmount`, or any error from loading or
/// appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_buy_practice(
    command: &BuyPractice,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.buy_practice(
        command.activity_id,
        command.practice,
        command.correlation_id,
        clock,
    )?;
    commit(command, orchestra, repo).await
}

/// Handles the `BuyTrip` command.
///
/// # Errors
///
/// Returns `OrchestraError::NegativeAmount` or
/// `OrchestraError::InsufficientFunds`, or any error from loading or
/// appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_buy_trip(
    command: &BuyTrip,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.buy_trip(
        command.activity_id,
        command.trip.clone(),
        command.correlation_id,
        clock,
    )?;
    commit(command, orchestra, repo).await
}

/// Handles the `BuyConcert` command.
///
/// # Errors
///
/// Returns `OrchestraError::InsufficientFunds` or
/// `OrchestraError::InsufficientExperience`, or any error from loading or
/// appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_buy_concert(
    command: &BuyConcert,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.buy_concert(
        command.activity_id,
        command.concert.clone(),
        command.correlation_id,
        clock,
    )?;
    commit(command, orchestra, repo).await
}

/// Handles the `BuyPracticeRoom` command.
///
/// # Errors
///
/// Returns `OrchestraError::InsufficientFunds` or
/// `OrchestraError::InsufficientCapacity`, or any error from loading or
/// appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_buy_practice_room(
    command: &BuyPracticeRoom,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.buy_practice_room(command.room.clone(), command.correlation_id, clock)?;
    commit(command, orchestra, repo).await
}

/// Handles the `UpdateSchedule` command.
///
/// # Errors
///
/// Returns `OrchestraError::OutOfRange` or `OrchestraError::NotFound`, or
/// any error from loading or appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id, day = command.day))]
pub async fn handle_update_schedule(
    command: &UpdateSchedule,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.update_schedule(
        command.day,
        command.activity_id,
        command.correlation_id,
        clock,
    )?;
    commit(command, orchestra, repo).await
}

/// Handles the `FreeScheduleSlot` command.
///
/// # Errors
///
/// Returns `OrchestraError::OutOfRange`, or any error from loading or
/// appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id, day = command.day))]
pub async fn handle_free_schedule_slot(
    command: &FreeScheduleSlot,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.free_schedule_slot(command.day, command.correlation_id, clock)?;
    commit(command, orchestra, repo).await
}

/// Handles the `RunScheduledWeek` command.
///
/// # Errors
///
/// Returns `OrchestraError::Overflow`, or any error from loading or
/// appending events.
#[instrument(skip_all, fields(orchestra_id = %command.orchestra_id, correlation_id = %command.correlation_id))]
pub async fn handle_run_scheduled_week(
    command: &RunScheduledWeek,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<OrchestraCommandResult, OrchestraError> {
    let mut orchestra = load(command.orchestra_id, repo).await?;
    orchestra.run_scheduled_week(command.correlation_id, clock)?;
    commit(command, orchestra, repo).await
}
