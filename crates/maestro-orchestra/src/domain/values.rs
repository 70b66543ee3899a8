//! Value records supplied by callers: musicians, rooms and activities.
//!
//! These carry attributes only. Identity is a `Uuid` so that two records
//! with equal attributes (say, two one-hour practices) stay distinct members
//! of the orchestra's sets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Instruments a musician can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Violin,
    Viola,
    Cello,
    DoubleBass,
    Harp,
    Piano,
    Flute,
    Oboe,
    Clarinet,
    Bassoon,
    Horn,
    Trumpet,
    Trombone,
    Tuba,
    Percussion,
}

/// A hirable member of the orchestra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Musician {
    /// Musician identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// The instrument they play.
    pub instrument: Instrument,
    /// Flavour text.
    pub description: String,
    /// Experience level.
    pub experience_level: i64,
    /// Hiring price.
    pub price: i64,
}

impl Musician {
    /// Creates a musician with a fresh identifier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        instrument: Instrument,
        description: impl Into<String>,
        experience_level: i64,
        price: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            instrument,
            description: description.into(),
            experience_level,
            price,
        }
    }
}

/// A practice room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// How many musicians fit.
    pub size: usize,
    /// Purchase price.
    pub price: i64,
    /// Location / description.
    pub location: String,
}

impl Room {
    #[must_use]
    pub fn new(size: usize, price: i64, location: impl Into<String>) -> Self {
        Self {
            size,
            price,
            location: location.into(),
        }
    }
}

/// A rehearsal block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practice {
    /// Minutes of practice credited when the week resolves.
    pub duration_minutes: i64,
}

/// A booked performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concert {
    pub price: i64,
    pub location: String,
    pub experience_reward: i64,
    pub revenue: i64,
    /// Experience the orchestra needs before it can book this concert.
    pub required_experience: i64,
}

/// A tour or excursion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub price: i64,
    pub location: String,
    pub experience_reward: i64,
}

/// Payload of an activity, one variant per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityKind {
    Practice(Practice),
    Concert(Concert),
    Trip(Trip),
}

/// A schedulable unit of play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity identifier.
    pub id: Uuid,
    /// What kind of activity this is.
    pub kind: ActivityKind,
}

impl Activity {
    /// Wraps `kind` under an existing identifier.
    #[must_use]
    pub fn new(id: Uuid, kind: ActivityKind) -> Self {
        Self { id, kind }
    }

    /// The purchase price. Practices are free.
    #[must_use]
    pub fn price(&self) -> i64 {
        match &self.kind {
            ActivityKind::Practice(_) => 0,
            ActivityKind::Concert(concert) => concert.price,
            ActivityKind::Trip(trip) => trip.price,
        }
    }

    /// Where the activity takes place, if it has a location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match &self.kind {
            ActivityKind::Practice(_) => None,
            ActivityKind::Concert(concert) => Some(&concert.location),
            ActivityKind::Trip(trip) => Some(&trip.location),
        }
    }
}
