//! Commands for the orchestra engine.

use maestro_core::command::Command;
use uuid::Uuid;

use super::values::{Activity, Concert, Musician, Practice, Room, Trip};

/// Command to create a new orchestra.
#[derive(Debug, Clone)]
pub struct FoundOrchestra {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// Display name.
    pub name: String,
    /// Musicians on the roster from the start.
    pub musicians: Vec<Musician>,
    /// Activities owned but not yet scheduled.
    pub unused_activities: Vec<Activity>,
}

/// Command to change the orchestra's display name.
#[derive(Debug, Clone)]
pub struct RenameOrchestra {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// New display name.
    pub name: String,
}

/// Command to hire a musician.
#[derive(Debug, Clone)]
pub struct BuyMusician {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// The musician to hire.
    pub musician: Musician,
}

/// Command to add a practice to the unused activities.
#[derive(Debug, Clone)]
pub struct BuyPractice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// Identifier the new activity will carry.
    pub activity_id: Uuid,
    pub practice: Practice,
}

/// Command to buy a trip.
#[derive(Debug, Clone)]
pub struct BuyTrip {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// Identifier the new activity will carry.
    pub activity_id: Uuid,
    pub trip: Trip,
}

/// Command to book a concert.
#[derive(Debug, Clone)]
pub struct BuyConcert {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// Identifier the new activity will carry.
    pub activity_id: Uuid,
    pub concert: Concert,
}

/// Command to replace the practice room.
#[derive(Debug, Clone)]
pub struct BuyPracticeRoom {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    pub room: Room,
}

/// Command to place an unused activity on a day.
#[derive(Debug, Clone)]
pub struct UpdateSchedule {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// Zero-based day index.
    pub day: usize,
    pub activity_id: Uuid,
}

/// Command to take a day's activity off the schedule.
#[derive(Debug, Clone)]
pub struct FreeScheduleSlot {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
    /// Zero-based day index.
    pub day: usize,
}

/// Command to resolve the scheduled week.
#[derive(Debug, Clone)]
pub struct RunScheduledWeek {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The orchestra identifier.
    pub orchestra_id: Uuid,
}

macro_rules! impl_command {
    ($($command:ty => $name:literal),* $(,)?) => {
        $(
            impl Command for $command {
                fn command_type(&self) -> &'static str {
                    $name
                }

                fn correlation_id(&self) -> Uuid {
                    self.correlation_id
                }

                fn aggregate_id(&self) -> Uuid {
                    self.orchestra_id
                }
            }
        )*
    };
}

impl_command! {
    FoundOrchestra => "orchestra.found",
    RenameOrchestra => "orchestra.rename",
    BuyMusician => "orchestra.buy_musician",
    BuyPractice => "orchestra.buy_practice",
    BuyTrip => "orchestra.buy_trip",
    BuyConcert => "orchestra.buy_concert",
    BuyPracticeRoom => "orchestra.buy_practice_room",
    UpdateSchedule => "orchestra.update_schedule",
    FreeScheduleSlot => "orchestra.free_schedule_slot",
    RunScheduledWeek => "orchestra.run_scheduled_week",
}
