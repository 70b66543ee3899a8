//! Domain events for the orchestra engine.

use maestro_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::values::{Activity, Musician, Room};

pub const ORCHESTRA_FOUNDED_EVENT_TYPE: &str = "orchestra.founded";
pub const ORCHESTRA_RENAMED_EVENT_TYPE: &str = "orchestra.renamed";
pub const MUSICIAN_HIRED_EVENT_TYPE: &str = "orchestra.musician_hired";
pub const ACTIVITY_PURCHASED_EVENT_TYPE: &str = "orchestra.activity_purchased";
pub const PRACTICE_ROOM_PURCHASED_EVENT_TYPE: &str = "orchestra.practice_room_purchased";
pub const ACTIVITY_SCHEDULED_EVENT_TYPE: &str = "orchestra.activity_scheduled";
pub const ACTIVITY_UNSCHEDULED_EVENT_TYPE: &str = "orchestra.activity_unscheduled";
pub const WEEK_RESOLVED_EVENT_TYPE: &str = "orchestra.week_resolved";

/// Emitted once, when an orchestra is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestraFounded {
    pub orchestra_id: Uuid,
    pub name: String,
    pub budget: i64,
    pub required_practice_for_concert: i64,
    pub practice_room: Room,
    pub schedule_size: usize,
    pub musicians: Vec<Musician>,
    pub unused_activities: Vec<Activity>,
}

/// Emitted when the orchestra changes its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestraRenamed {
    pub orchestra_id: Uuid,
    pub name: String,
}

/// Emitted when a musician is hired. The price is charged even when the
/// musician was already on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicianHired {
    pub orchestra_id: Uuid,
    pub musician: Musician,
}

/// Emitted when a practice, trip or concert is bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPurchased {
    pub orchestra_id: Uuid,
    pub activity: Activity,
}

/// Emitted when a new practice room replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeRoomPurchased {
    pub orchestra_id: Uuid,
    pub room: Room,
}

/// Emitted when an unused activity is placed on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityScheduled {
    pub orchestra_id: Uuid,
    pub day: usize,
    pub activity_id: Uuid,
    /// The previous occupant of the slot, now back among unused activities.
    pub displaced_activity_id: Option<Uuid>,
}

/// Emitted when a day's activity is taken off the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityUnscheduled {
    pub orchestra_id: Uuid,
    pub day: usize,
    pub activity_id: Uuid,
}

/// Emitted when the scheduled week is run. Carries the net effect so that
/// replay does not depend on the rules that computed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekResolved {
    pub orchestra_id: Uuid,
    /// Activities consumed, in day order.
    pub resolved_activity_ids: Vec<Uuid>,
    pub concerts_performed: i64,
    pub practice_minutes_delta: i64,
    pub experience_delta: i64,
    pub budget_delta: i64,
}

/// Event payload variants for the orchestra engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrchestraEventKind {
    OrchestraFounded(OrchestraFounded),
    OrchestraRenamed(OrchestraRenamed),
    MusicianHired(MusicianHired),
    ActivityPurchased(ActivityPurchased),
    PracticeRoomPurchased(PracticeRoomPurchased),
    ActivityScheduled(ActivityScheduled),
    ActivityUnscheduled(ActivityUnscheduled),
    WeekResolved(WeekResolved),
}

impl OrchestraEventKind {
    /// The event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::OrchestraFounded(_) => ORCHESTRA_FOUNDED_EVENT_TYPE,
            Self::OrchestraRenamed(_) => ORCHESTRA_RENAMED_EVENT_TYPE,
            Self::MusicianHired(_) => MUSICIAN_HIRED_EVENT_TYPE,
            Self::ActivityPurchased(_) => ACTIVITY_PURCHASED_EVENT_TYPE,
            Self::PracticeRoomPurchased(_) => PRACTICE_ROOM_PURCHASED_EVENT_TYPE,
            Self::ActivityScheduled(_) => ACTIVITY_SCHEDULED_EVENT_TYPE,
            Self::ActivityUnscheduled(_) => ACTIVITY_UNSCHEDULED_EVENT_TYPE,
            Self::WeekResolved(_) => WEEK_RESOLVED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the orchestra engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestraEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: OrchestraEventKind,
}

impl DomainEvent for OrchestraEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("OrchestraEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
