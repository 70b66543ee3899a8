//! The `Orchestra` aggregate root.

use std::collections::BTreeMap;

use maestro_core::aggregate::AggregateRoot;
use maestro_core::clock::Clock;
use maestro_core::event::EventMetadata;
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::OrchestraError;
use super::events::{
    ActivityPurchased, ActivityScheduled, ActivityUnscheduled, MusicianHired, OrchestraEvent,
    OrchestraEventKind, OrchestraFounded, OrchestraRenamed, PracticeRoomPurchased, WeekResolved,
};
use super::values::{Activity, ActivityKind, Concert, Musician, Practice, Room, Trip};
use crate::config::OrchestraConfig;

/// The aggregate root for an orchestra.
///
/// Every operation validates first and only then records an event, which is
/// applied on the spot. A rejected call therefore never changes state, and a
/// successful one is visible through the accessors immediately.
#[derive(Debug)]
pub struct Orchestra {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Committed version (events already persisted).
    pub(crate) version: i64,
    name: String,
    budget: i64,
    experience: i64,
    practice_minutes: i64,
    required_practice_for_concert: i64,
    musicians: BTreeMap<Uuid, Musician>,
    practice_room: Room,
    unused_activities: BTreeMap<Uuid, Activity>,
    schedule: Vec<Option<Activity>>,
    /// Events recorded since the last commit.
    uncommitted_events: Vec<OrchestraEvent>,
}

impl Orchestra {
    /// An empty shell, filled in by replaying an `OrchestraFounded` event.
    pub(crate) fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            name: String::new(),
            budget: 0,
            experience: 0,
            practice_minutes: 0,
            required_practice_for_concert: 0,
            musicians: BTreeMap::new(),
            practice_room: Room::new(0, 0, ""),
            unused_activities: BTreeMap::new(),
            schedule: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates an orchestra with an empty `config.schedule_days`-day
    /// schedule, producing an `OrchestraFounded` event.
    #[must_use]
    pub fn found(
        id: Uuid,
        name: String,
        musicians: Vec<Musician>,
        unused_activities: Vec<Activity>,
        config: &OrchestraConfig,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        let mut orchestra = Self::new(id);
        orchestra.record(
            OrchestraEventKind::OrchestraFounded(OrchestraFounded {
                orchestra_id: id,
                name,
                budget: config.starting_budget,
                required_practice_for_concert: config.required_practice_for_concert,
                practice_room: config.default_practice_room.clone(),
                schedule_size: config.schedule_days,
                musicians,
                unused_activities,
            }),
            correlation_id,
            clock,
        );
        orchestra
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn budget(&self) -> i64 {
        self.budget
    }

    #[must_use]
    pub fn experience(&self) -> i64 {
        self.experience
    }

    #[must_use]
    pub fn practice_minutes(&self) -> i64 {
        self.practice_minutes
    }

    #[must_use]
    pub fn required_practice_for_concert(&self) -> i64 {
        self.required_practice_for_concert
    }

    /// The roster, keyed by musician id.
    #[must_use]
    pub fn musicians(&self) -> &BTreeMap<Uuid, Musician> {
        &self.musicians
    }

    #[must_use]
    pub fn practice_room(&self) -> &Room {
        &self.practice_room
    }

    /// Purchased activities not placed on any day, keyed by activity id.
    #[must_use]
    pub fn unused_activities(&self) -> &BTreeMap<Uuid, Activity> {
        &self.unused_activities
    }

    /// One slot per day; `None` is a free day.
    #[must_use]
    pub fn schedule(&self) -> &[Option<Activity>] {
        &self.schedule
    }

    #[must_use]
    pub fn schedule_size(&self) -> usize {
        self.schedule.len()
    }

    /// Changes the display name, producing an `OrchestraRenamed` event.
    pub fn rename(&mut self, name: String, correlation_id: Uuid, clock: &dyn Clock) {
        self.record(
            OrchestraEventKind::OrchestraRenamed(OrchestraRenamed {
                orchestra_id: self.id,
                name,
            }),
            correlation_id,
            clock,
        );
    }

    /// Hires a musician, producing a `MusicianHired` event.
    ///
    /// The price is charged without an affordability check, so the budget
    /// may go negative. Rehiring a musician already on the roster charges
    /// again and leaves the roster as it was.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::NegativeAmount` if the price is negative, or
    /// `OrchestraError::Overflow` if charging it would overflow the budget.
    pub fn buy_musician(
        &mut self,
        musician: Musician,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        let checked = ensure_non_negative("musician price", musician.price).and_then(|()| {
            self.budget
                .checked_sub(musician.price)
                .map(drop)
                .ok_or(OrchestraError::Overflow("budget"))
        });
        if let Err(err) = checked {
            return self.reject("buy_musician", err);
        }
        self.record(
            OrchestraEventKind::MusicianHired(MusicianHired {
                orchestra_id: self.id,
                musician,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Adds a free practice to the unused activities.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::NegativeAmount` if the duration is negative.
    pub fn buy_practice(
        &mut self,
        activity_id: Uuid,
        practice: Practice,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        if let Err(err) = ensure_non_negative("practice duration", practice.duration_minutes) {
            return self.reject("buy_practice", err);
        }
        self.purchase(
            Activity::new(activity_id, ActivityKind::Practice(practice)),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Buys a trip.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::NegativeAmount` if the price or reward is
    /// negative, otherwise `OrchestraError::InsufficientFunds` if the trip
    /// costs more than the budget.
    pub fn buy_trip(
        &mut self,
        activity_id: Uuid,
        trip: Trip,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        let checked = ensure_non_negative("trip experience reward", trip.experience_reward)
            .and_then(|()| self.ensure_affordable(trip.price));
        if let Err(err) = checked {
            return self.reject("buy_trip", err);
        }
        self.purchase(
            Activity::new(activity_id, ActivityKind::Trip(trip)),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Books a concert. Funds are checked before experience.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::NegativeAmount` if the price, reward or
    /// revenue is negative. Otherwise returns
    /// `OrchestraError::InsufficientFunds` if the concert costs more than the
    /// budget, then `OrchestraError::InsufficientExperience` if the
    /// orchestra lacks the required experience.
    pub fn buy_concert(
        &mut self,
        activity_id: Uuid,
        concert: Concert,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        let checked = ensure_non_negative("concert experience reward", concert.experience_reward)
            .and_then(|()| ensure_non_negative("concert revenue", concert.revenue))
            .and_then(|()| self.ensure_affordable(concert.price));
        if let Err(err) = checked {
            return self.reject("buy_concert", err);
        }
        if self.experience < concert.required_experience {
            let err = OrchestraError::InsufficientExperience {
                required: concert.required_experience,
                experience: self.experience,
            };
            return self.reject("buy_concert", err);
        }
        self.purchase(
            Activity::new(activity_id, ActivityKind::Concert(concert)),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Replaces the practice room. The old room is not refunded.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::NegativeAmount` if the price is negative,
    /// otherwise `OrchestraError::InsufficientFunds` if the room costs more
    /// than the budget, then `OrchestraError::InsufficientCapacity` if it
    /// cannot hold every musician on the roster.
    pub fn buy_practice_room(
        &mut self,
        room: Room,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        if let Err(err) = self.ensure_affordable(room.price) {
            return self.reject("buy_practice_room", err);
        }
        if room.size < self.musicians.len() {
            let err = OrchestraError::InsufficientCapacity {
                size: room.size,
                musicians: self.musicians.len(),
            };
            return self.reject("buy_practice_room", err);
        }
        self.record(
            OrchestraEventKind::PracticeRoomPurchased(PracticeRoomPurchased {
                orchestra_id: self.id,
                room,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Places an unused activity on `day`. Whatever occupied the day goes
    /// back to the unused activities.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::OutOfRange` if `day` is not a schedule day,
    /// otherwise `OrchestraError::NotFound` if the activity is not unused
    /// (never bought, or already scheduled).
    pub fn update_schedule(
        &mut self,
        day: usize,
        activity_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        if let Err(err) = self.ensure_day(day) {
            return self.reject("update_schedule", err);
        }
        if !self.unused_activities.contains_key(&activity_id) {
            return self.reject("update_schedule", OrchestraError::NotFound(activity_id));
        }
        let displaced_activity_id = self.schedule[day].as_ref().map(|activity| activity.id);
        self.record(
            OrchestraEventKind::ActivityScheduled(ActivityScheduled {
                orchestra_id: self.id,
                day,
                activity_id,
                displaced_activity_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Moves the activity on `day` back to the unused activities. A free
    /// day is left alone and records nothing.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::OutOfRange` if `day` is not a schedule day.
    pub fn free_schedule_slot(
        &mut self,
        day: usize,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        if let Err(err) = self.ensure_day(day) {
            return self.reject("free_schedule_slot", err);
        }
        let Some(activity_id) = self.schedule[day].as_ref().map(|activity| activity.id) else {
            return Ok(());
        };
        self.record(
            OrchestraEventKind::ActivityUnscheduled(ActivityUnscheduled {
                orchestra_id: self.id,
                day,
                activity_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Runs every scheduled activity once and clears the schedule,
    /// producing a `WeekResolved` event.
    ///
    /// Practices add their minutes. Concerts add their experience reward,
    /// move the budget by `revenue - price` on top of the purchase charge,
    /// and use up `required_practice_for_concert` practice minutes. Trips add
    /// their experience reward. Resolved activities are consumed.
    ///
    /// # Errors
    ///
    /// Returns `OrchestraError::Overflow` if a total would leave the `i64`
    /// range. The schedule is left untouched in that case.
    pub fn run_scheduled_week(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrchestraError> {
        let week = match self.resolve_week() {
            Ok(week) => week,
            Err(err) => return self.reject("run_scheduled_week", err),
        };

        info!(
            orchestra_id = %self.id,
            activities = week.resolved_activity_ids.len(),
            concerts = week.concerts_performed,
            practice_minutes_delta = week.practice_minutes_delta,
            experience_delta = week.experience_delta,
            budget_delta = week.budget_delta,
            "week resolved"
        );

        self.record(OrchestraEventKind::WeekResolved(week), correlation_id, clock);
        Ok(())
    }

    fn resolve_week(&self) -> Result<WeekResolved, OrchestraError> {
        let mut week = WeekResolved {
            orchestra_id: self.id,
            resolved_activity_ids: Vec::new(),
            concerts_performed: 0,
            practice_minutes_delta: 0,
            experience_delta: 0,
            budget_delta: 0,
        };

        for activity in self.schedule.iter().flatten() {
            week.resolved_activity_ids.push(activity.id);
            match &activity.kind {
                ActivityKind::Practice(practice) => {
                    week.practice_minutes_delta = add(
                        week.practice_minutes_delta,
                        practice.duration_minutes,
                        "practice minutes",
                    )?;
                }
                ActivityKind::Concert(concert) => {
                    week.concerts_performed += 1;
                    week.experience_delta =
                        add(week.experience_delta, concert.experience_reward, "experience")?;
                    let net = concert
                        .revenue
                        .checked_sub(concert.price)
                        .ok_or(OrchestraError::Overflow("budget"))?;
                    week.budget_delta = add(week.budget_delta, net, "budget")?;
                    week.practice_minutes_delta = week
                        .practice_minutes_delta
                        .checked_sub(self.required_practice_for_concert)
                        .ok_or(OrchestraError::Overflow("practice minutes"))?;
                }
                ActivityKind::Trip(trip) => {
                    week.experience_delta =
                        add(week.experience_delta, trip.experience_reward, "experience")?;
                }
            }
        }

        add(self.practice_minutes, week.practice_minutes_delta, "practice minutes")?;
        add(self.experience, week.experience_delta, "experience")?;
        add(self.budget, week.budget_delta, "budget")?;
        Ok(week)
    }

    fn purchase(&mut self, activity: Activity, correlation_id: Uuid, clock: &dyn Clock) {
        self.record(
            OrchestraEventKind::ActivityPurchased(ActivityPurchased {
                orchestra_id: self.id,
                activity,
            }),
            correlation_id,
            clock,
        );
    }

    fn ensure_affordable(&self, price: i64) -> Result<(), OrchestraError> {
        ensure_non_negative("price", price)?;
        if price > self.budget {
            return Err(OrchestraError::InsufficientFunds {
                price,
                budget: self.budget,
            });
        }
        Ok(())
    }

    fn ensure_day(&self, day: usize) -> Result<(), OrchestraError> {
        if day >= self.schedule.len() {
            return Err(OrchestraError::OutOfRange {
                day,
                schedule_size: self.schedule.len(),
            });
        }
        Ok(())
    }

    fn reject(&self, operation: &'static str, err: OrchestraError) -> Result<(), OrchestraError> {
        debug!(orchestra_id = %self.id, operation, error = %err, "operation rejected");
        Err(err)
    }

    /// Whether the activity is unused or on the schedule.
    fn owns_activity(&self, activity_id: Uuid) -> bool {
        self.unused_activities.contains_key(&activity_id)
            || self
                .schedule
                .iter()
                .flatten()
                .any(|activity| activity.id == activity_id)
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    /// Wraps `kind` in an envelope, applies it and queues it for commit.
    fn record(&mut self, kind: OrchestraEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = OrchestraEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.mutate(&event.kind);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, kind: &OrchestraEventKind) {
        match kind {
            OrchestraEventKind::OrchestraFounded(payload) => {
                self.name.clone_from(&payload.name);
                self.budget = payload.budget;
                self.experience = 0;
                self.practice_minutes = 0;
                self.required_practice_for_concert = payload.required_practice_for_concert;
                self.practice_room = payload.practice_room.clone();
                self.schedule = vec![None; payload.schedule_size];
                self.musicians = payload
                    .musicians
                    .iter()
                    .map(|musician| (musician.id, musician.clone()))
                    .collect();
                self.unused_activities = payload
                    .unused_activities
                    .iter()
                    .map(|activity| (activity.id, activity.clone()))
                    .collect();
            }
            OrchestraEventKind::OrchestraRenamed(payload) => {
                self.name.clone_from(&payload.name);
            }
            OrchestraEventKind::MusicianHired(payload) => {
                self.budget = self.budget.saturating_sub(payload.musician.price);
                self.musicians
                    .entry(payload.musician.id)
                    .or_insert_with(|| payload.musician.clone());
            }
            OrchestraEventKind::ActivityPurchased(payload) => {
                self.budget = self.budget.saturating_sub(payload.activity.price());
                if !self.owns_activity(payload.activity.id) {
                    self.unused_activities
                        .insert(payload.activity.id, payload.activity.clone());
                }
            }
            OrchestraEventKind::PracticeRoomPurchased(payload) => {
                self.budget = self.budget.saturating_sub(payload.room.price);
                self.practice_room = payload.room.clone();
            }
            OrchestraEventKind::ActivityScheduled(payload) => {
                let Some(slot) = self.schedule.get_mut(payload.day) else {
                    return;
                };
                let Some(activity) = self.unused_activities.remove(&payload.activity_id) else {
                    return;
                };
                if let Some(displaced) = slot.replace(activity) {
                    self.unused_activities.insert(displaced.id, displaced);
                }
            }
            OrchestraEventKind::ActivityUnscheduled(payload) => {
                if let Some(activity) = self.schedule.get_mut(payload.day).and_then(Option::take) {
                    self.unused_activities.insert(activity.id, activity);
                }
            }
            OrchestraEventKind::WeekResolved(payload) => {
                self.practice_minutes = self
                    .practice_minutes
                    .saturating_add(payload.practice_minutes_delta);
                self.experience = self.experience.saturating_add(payload.experience_delta);
                self.budget = self.budget.saturating_add(payload.budget_delta);
                self.schedule.fill(None);
            }
        }
    }
}

fn ensure_non_negative(field: &'static str, value: i64) -> Result<(), OrchestraError> {
    if value < 0 {
        return Err(OrchestraError::NegativeAmount { field, value });
    }
    Ok(())
}

fn add(total: i64, delta: i64, field: &'static str) -> Result<i64, OrchestraError> {
    total
        .checked_add(delta)
        .ok_or(OrchestraError::Overflow(field))
}

impl AggregateRoot for Orchestra {
    type Event = OrchestraEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(&event.kind);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    #[allow(clippy::cast_possible_wrap)]
    fn clear_uncommitted_events(&mut self) {
        self.version += self.uncommitted_events.len() as i64;
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_core::event::DomainEvent;
    use maestro_test_support::{FixedClock, fixed_clock};

    use crate::domain::events::{
        ACTIVITY_PURCHASED_EVENT_TYPE, ACTIVITY_SCHEDULED_EVENT_TYPE,
        ACTIVITY_UNSCHEDULED_EVENT_TYPE, MUSICIAN_HIRED_EVENT_TYPE, ORCHESTRA_FOUNDED_EVENT_TYPE,
        ORCHESTRA_RENAMED_EVENT_TYPE, WEEK_RESOLVED_EVENT_TYPE,
    };
    use crate::domain::values::Instrument;

    fn founded() -> (Orchestra, FixedClock) {
        let clock = fixed_clock();
        let mut orchestra = Orchestra::found(
            Uuid::new_v4(),
            "Test".to_owned(),
            Vec::new(),
            Vec::new(),
            &OrchestraConfig::default(),
            Uuid::new_v4(),
            &clock,
        );
        orchestra.clear_uncommitted_events();
        (orchestra, clock)
    }

    fn musician(name: &str, price: i64) -> Musician {
        Musician::new(name, Instrument::Bassoon, "Loves tests", 3, price)
    }

    fn practice(minutes: i64) -> Practice {
        Practice {
            duration_minutes: minutes,
        }
    }

    fn trip(price: i64, experience_reward: i64) -> Trip {
        Trip {
            price,
            location: "TestLocation".to_owned(),
            experience_reward,
        }
    }

    fn concert(price: i64, experience_reward: i64, revenue: i64, required: i64) -> Concert {
        Concert {
            price,
            location: "TestLocation".to_owned(),
            experience_reward,
            revenue,
            required_experience: required,
        }
    }

    /// Buys `kind` and places it on `day`, returning its id.
    fn schedule(orchestra: &mut Orchestra, clock: &FixedClock, day: usize, kind: ActivityKind) -> Uuid {
        let id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        match kind {
            ActivityKind::Practice(p) => {
                orchestra.buy_practice(id, p, correlation_id, clock).unwrap();
            }
            ActivityKind::Trip(t) => orchestra.buy_trip(id, t, correlation_id, clock).unwrap(),
            ActivityKind::Concert(c) => {
                orchestra.buy_concert(id, c, correlation_id, clock).unwrap();
            }
        }
        orchestra
            .update_schedule(day, id, correlation_id, clock)
            .unwrap();
        id
    }

    // --- founding ---

    #[test]
    fn test_found_produces_founded_event_and_initial_state() {
        // Arrange
        let orchestra_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = fixed_clock();
        let peter = musician("Peter", 0);
        let warmup = Activity::new(Uuid::new_v4(), ActivityKind::Practice(practice(15)));

        // Act
        let orchestra = Orchestra::found(
            orchestra_id,
            "Sinfonietta".to_owned(),
            vec![peter.clone()],
            vec![warmup.clone()],
            &OrchestraConfig::default(),
            correlation_id,
            &clock,
        );

        // Assert
        assert_eq!(orchestra.name(), "Sinfonietta");
        assert_eq!(orchestra.budget(), 1000);
        assert_eq!(orchestra.experience(), 0);
        assert_eq!(orchestra.practice_minutes(), 0);
        assert_eq!(orchestra.required_practice_for_concert(), 2);
        assert_eq!(orchestra.schedule_size(), 7);
        assert!(orchestra.schedule().iter().all(Option::is_none));
        assert_eq!(orchestra.practice_room().size, 3);
        assert_eq!(orchestra.practice_room().price, 0);
        assert_eq!(orchestra.musicians().get(&peter.id), Some(&peter));
        assert_eq!(orchestra.unused_activities().get(&warmup.id), Some(&warmup));

        let events = orchestra.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), ORCHESTRA_FOUNDED_EVENT_TYPE);
        let meta = events[0].metadata();
        assert_eq!(meta.aggregate_id, orchestra_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.causation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.now());
    }

    #[test]
    fn test_found_uses_configured_schedule_and_budget() {
        let clock = fixed_clock();
        let config = OrchestraConfig {
            starting_budget: 40,
            schedule_days: 5,
            ..OrchestraConfig::default()
        };

        let orchestra = Orchestra::found(
            Uuid::new_v4(),
            "Quintet".to_owned(),
            Vec::new(),
            Vec::new(),
            &config,
            Uuid::new_v4(),
            &clock,
        );

        assert_eq!(orchestra.budget(), 40);
        assert_eq!(orchestra.schedule_size(), 5);
    }

    #[test]
    fn test_rename_changes_name() {
        let (mut orchestra, clock) = founded();

        orchestra.rename("Renamed".to_owned(), Uuid::new_v4(), &clock);

        assert_eq!(orchestra.name(), "Renamed");
    }

    // --- roster ---

    #[test]
    fn test_buy_musician_adds_musician_to_roster() {
        let (mut orchestra, clock) = founded();
        let hire = musician("Musician", 100);

        orchestra.buy_musician(hire.clone(), Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.musicians().len(), 1);
        assert_eq!(orchestra.musicians().get(&hire.id), Some(&hire));
    }

    #[test]
    fn test_buy_musician_removes_price_from_budget() {
        let (mut orchestra, clock) = founded();

        orchestra.buy_musician(musician("Musician", 100), Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.budget(), 900);
    }

    #[test]
    fn test_buy_musician_produces_sequenced_event() {
        let (mut orchestra, clock) = founded();
        let correlation_id = Uuid::new_v4();

        orchestra.buy_musician(musician("Musician", 100), correlation_id, &clock).unwrap();

        let events = orchestra.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), MUSICIAN_HIRED_EVENT_TYPE);
        assert_eq!(events[0].metadata().sequence_number, 2);
        assert_eq!(events[0].metadata().correlation_id, correlation_id);
    }

    // Hiring is never refused for lack of money; the budget simply goes
    // negative. Kept deliberately, unlike every other purchase.
    #[test]
    fn test_buy_musician_has_no_affordability_check() {
        let (mut orchestra, clock) = founded();

        orchestra.buy_musician(musician("Star", 1500), Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.budget(), -500);
        assert_eq!(orchestra.musicians().len(), 1);
    }

    #[test]
    fn test_buy_musician_twice_charges_twice_but_keeps_one_entry() {
        let (mut orchestra, clock) = founded();
        let hire = musician("Musician", 100);

        orchestra.buy_musician(hire.clone(), Uuid::new_v4(), &clock).unwrap();
        orchestra.buy_musician(hire, Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.musicians().len(), 1);
        assert_eq!(orchestra.budget(), 800);
    }

    // --- activity purchases ---

    #[test]
    fn test_buy_practice_adds_to_unused_activities_for_free() {
        let (mut orchestra, clock) = founded();
        let id = Uuid::new_v4();

        orchestra.buy_practice(id, practice(1), Uuid::new_v4(), &clock).unwrap();

        assert!(orchestra.unused_activities().contains_key(&id));
        assert_eq!(orchestra.budget(), 1000);
        assert_eq!(
            orchestra.uncommitted_events()[0].event_type(),
            ACTIVITY_PURCHASED_EVENT_TYPE
        );
    }

    #[test]
    fn test_buy_trip_removes_price_from_budget() {
        for (price, expected) in [(100, 900), (50, 950), (1000, 0), (500, 500)] {
            let (mut orchestra, clock) = founded();
            let id = Uuid::new_v4();

            orchestra
                .buy_trip(id, trip(price, 0), Uuid::new_v4(), &clock)
                .unwrap();

            assert_eq!(orchestra.budget(), expected, "price {price}");
            assert!(orchestra.unused_activities().contains_key(&id));
        }
    }

    #[test]
    fn test_buy_trip_without_funds_fails_and_changes_nothing() {
        for price in [1001, 2000, 5000] {
            let (mut orchestra, clock) = founded();

            let result = orchestra.buy_trip(Uuid::new_v4(), trip(price, 0), Uuid::new_v4(), &clock);

            match result.unwrap_err() {
                OrchestraError::InsufficientFunds {
                    price: charged,
                    budget,
                } => {
                    assert_eq!(charged, price);
                    assert_eq!(budget, 1000);
                }
                other => panic!("expected InsufficientFunds, got {other:?}"),
            }
            assert_eq!(orchestra.budget(), 1000);
            assert!(orchestra.unused_activities().is_empty());
            assert!(orchestra.uncommitted_events().is_empty());
        }
    }

    #[test]
    fn test_buy_concert_removes_price_from_budget() {
        for (price, expected) in [(100, 900), (50, 950), (1000, 0), (500, 500)] {
            let (mut orchestra, clock) = founded();
            let id = Uuid::new_v4();

            orchestra
                .buy_concert(id, concert(price, 0, 0, 0), Uuid::new_v4(), &clock)
                .unwrap();

            assert_eq!(orchestra.budget(), expected, "price {price}");
            assert!(orchestra.unused_activities().contains_key(&id));
        }
    }

    #[test]
    fn test_buy_concert_without_experience_fails() {
        for required in [1, 100, 500, 1000] {
            let (mut orchestra, clock) = founded();

            let result = orchestra.buy_concert(
                Uuid::new_v4(),
                concert(0, 0, 0, required),
                Uuid::new_v4(),
                &clock,
            );

            match result.unwrap_err() {
                OrchestraError::InsufficientExperience {
                    required: needed,
                    experience,
                } => {
                    assert_eq!(needed, required);
                    assert_eq!(experience, 0);
                }
                other => panic!("expected InsufficientExperience, got {other:?}"),
            }
            assert!(orchestra.unused_activities().is_empty());
        }
    }

    #[test]
    fn test_buy_concert_without_funds_fails() {
        for price in [1001, 2000, 5000] {
            let (mut orchestra, clock) = founded();

            let result =
                orchestra.buy_concert(Uuid::new_v4(), concert(price, 0, 0, 0), Uuid::new_v4(), &clock);

            assert!(matches!(
                result,
                Err(OrchestraError::InsufficientFunds { .. })
            ));
            assert_eq!(orchestra.budget(), 1000);
            assert!(orchestra.unused_activities().is_empty());
        }
    }

    #[test]
    fn test_buy_concert_reports_funds_before_experience() {
        let (mut orchestra, clock) = founded();

        let result =
            orchestra.buy_concert(Uuid::new_v4(), concert(5000, 0, 0, 5000), Uuid::new_v4(), &clock);

        assert!(matches!(
            result,
            Err(OrchestraError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_buy_concert_succeeds_once_experience_is_earned() {
        let (mut orchestra, clock) = founded();
        schedule(&mut orchestra, &clock, 0, ActivityKind::Trip(trip(0, 60)));
        orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();
        let id = Uuid::new_v4();

        orchestra
            .buy_concert(id, concert(10, 0, 0, 50), Uuid::new_v4(), &clock)
            .unwrap();

        assert!(orchestra.unused_activities().contains_key(&id));
        assert_eq!(orchestra.budget(), 990);
    }

    #[test]
    fn test_buying_an_owned_activity_id_keeps_it_in_one_place() {
        let (mut orchestra, clock) = founded();
        let id = schedule(&mut orchestra, &clock, 2, ActivityKind::Practice(practice(10)));

        orchestra.buy_practice(id, practice(10), Uuid::new_v4(), &clock).unwrap();

        assert!(!orchestra.unused_activities().contains_key(&id));
        assert_eq!(
            orchestra.schedule()[2].as_ref().map(|activity| activity.id),
            Some(id)
        );
    }

    // --- practice room ---

    #[test]
    fn test_buy_practice_room_removes_money() {
        for (price, expected) in [(1, 999), (100, 900), (500, 500), (1000, 0)] {
            let (mut orchestra, clock) = founded();

            orchestra
                .buy_practice_room(Room::new(1, price, "TestLocation"), Uuid::new_v4(), &clock)
                .unwrap();

            assert_eq!(orchestra.budget(), expected, "price {price}");
        }
    }

    #[test]
    fn test_buy_practice_room_replaces_room() {
        let (mut orchestra, clock) = founded();
        let room = Room::new(1, 1, "TestLocation");

        orchestra
            .buy_practice_room(room.clone(), Uuid::new_v4(), &clock)
            .unwrap();

        assert_eq!(orchestra.practice_room(), &room);
    }

    #[test]
    fn test_buy_practice_room_without_funds_fails() {
        let (mut orchestra, clock) = founded();
        let original = orchestra.practice_room().clone();

        let result =
            orchestra.buy_practice_room(Room::new(1, 1001, "TestLocation"), Uuid::new_v4(), &clock);

        assert!(matches!(
            result,
            Err(OrchestraError::InsufficientFunds { .. })
        ));
        assert_eq!(orchestra.practice_room(), &original);
    }

    #[test]
    fn test_buy_practice_room_too_small_fails_and_changes_nothing() {
        // Arrange
        let (mut orchestra, clock) = founded();
        let peter = Musician::new("Peter", Instrument::Bassoon, "Loves tests", 1, 0);
        let mie = Musician::new("Mie", Instrument::Oboe, "Testing", 1, 0);
        orchestra.buy_musician(peter, Uuid::new_v4(), &clock).unwrap();
        orchestra.buy_musician(mie, Uuid::new_v4(), &clock).unwrap();
        let original = orchestra.practice_room().clone();

        // Act
        let result =
            orchestra.buy_practice_room(Room::new(1, 1, "TestLocation"), Uuid::new_v4(), &clock);

        // Assert
        match result.unwrap_err() {
            OrchestraError::InsufficientCapacity { size, musicians } => {
                assert_eq!(size, 1);
                assert_eq!(musicians, 2);
            }
            other => panic!("expected InsufficientCapacity, got {other:?}"),
        }
        assert_eq!(orchestra.budget(), 1000);
        assert_eq!(orchestra.practice_room(), &original);
    }

    #[test]
    fn test_buy_practice_room_exactly_fitting_roster_succeeds() {
        let (mut orchestra, clock) = founded();
        orchestra.buy_musician(musician("A", 0), Uuid::new_v4(), &clock).unwrap();
        orchestra.buy_musician(musician("B", 0), Uuid::new_v4(), &clock).unwrap();

        let result =
            orchestra.buy_practice_room(Room::new(2, 0, "Cosy"), Uuid::new_v4(), &clock);

        assert!(result.is_ok());
        assert_eq!(orchestra.practice_room().size, 2);
    }

    // --- schedule ---

    #[test]
    fn test_update_schedule_places_activity_and_removes_it_from_unused() {
        let (mut orchestra, clock) = founded();
        let id = Uuid::new_v4();
        orchestra.buy_practice(id, practice(1), Uuid::new_v4(), &clock).unwrap();

        orchestra
            .update_schedule(0, id, Uuid::new_v4(), &clock)
            .unwrap();

        assert_eq!(
            orchestra.schedule()[0].as_ref().map(|activity| activity.id),
            Some(id)
        );
        assert!(!orchestra.unused_activities().contains_key(&id));
        let last = orchestra.uncommitted_events().last().unwrap();
        assert_eq!(last.event_type(), ACTIVITY_SCHEDULED_EVENT_TYPE);
    }

    #[test]
    fn test_update_schedule_overrides_and_returns_displaced_activity() {
        // Arrange
        let (mut orchestra, clock) = founded();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        orchestra.buy_practice(first, practice(1), Uuid::new_v4(), &clock).unwrap();
        orchestra.buy_practice(second, practice(2), Uuid::new_v4(), &clock).unwrap();

        // Act
        orchestra
            .update_schedule(0, first, Uuid::new_v4(), &clock)
            .unwrap();
        orchestra
            .update_schedule(0, second, Uuid::new_v4(), &clock)
            .unwrap();

        // Assert
        assert_eq!(
            orchestra.schedule()[0].as_ref().map(|activity| activity.id),
            Some(second)
        );
        assert!(orchestra.unused_activities().contains_key(&first));
        assert!(!orchestra.unused_activities().contains_key(&second));
        match &orchestra.uncommitted_events().last().unwrap().kind {
            OrchestraEventKind::ActivityScheduled(payload) => {
                assert_eq!(payload.displaced_activity_id, Some(first));
            }
            other => panic!("expected ActivityScheduled, got {other:?}"),
        }
    }

    #[test]
    fn test_update_schedule_day_out_of_range_fails() {
        for day in [7, 8, 100] {
            let (mut orchestra, clock) = founded();
            let id = Uuid::new_v4();
            orchestra.buy_practice(id, practice(1), Uuid::new_v4(), &clock).unwrap();

            let result = orchestra.update_schedule(day, id, Uuid::new_v4(), &clock);

            match result.unwrap_err() {
                OrchestraError::OutOfRange { day: bad, schedule_size } => {
                    assert_eq!(bad, day);
                    assert_eq!(schedule_size, 7);
                }
                other => panic!("expected OutOfRange, got {other:?}"),
            }
            assert!(orchestra.unused_activities().contains_key(&id));
        }
    }

    #[test]
    fn test_update_schedule_out_of_range_wins_over_unknown_activity() {
        let (mut orchestra, clock) = founded();

        let result = orchestra.update_schedule(7, Uuid::new_v4(), Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(OrchestraError::OutOfRange { .. })));
    }

    #[test]
    fn test_update_schedule_with_activity_not_unused_fails() {
        let (mut orchestra, clock) = founded();
        let unknown = Uuid::new_v4();

        let result = orchestra.update_schedule(0, unknown, Uuid::new_v4(), &clock);

        match result.unwrap_err() {
            OrchestraError::NotFound(id) => assert_eq!(id, unknown),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(orchestra.schedule().iter().all(Option::is_none));
    }

    #[test]
    fn test_update_schedule_rejects_moving_a_scheduled_activity() {
        let (mut orchestra, clock) = founded();
        let id = schedule(&mut orchestra, &clock, 1, ActivityKind::Practice(practice(5)));

        let result = orchestra.update_schedule(3, id, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(OrchestraError::NotFound(_))));
        assert!(orchestra.schedule()[1].is_some());
        assert!(orchestra.schedule()[3].is_none());
    }

    #[test]
    fn test_free_schedule_slot_returns_activity_to_unused() {
        let (mut orchestra, clock) = founded();
        let id = schedule(&mut orchestra, &clock, 4, ActivityKind::Practice(practice(5)));

        orchestra
            .free_schedule_slot(4, Uuid::new_v4(), &clock)
            .unwrap();

        assert!(orchestra.schedule()[4].is_none());
        assert!(orchestra.unused_activities().contains_key(&id));
    }

    #[test]
    fn test_free_schedule_slot_on_free_day_records_nothing() {
        let (mut orchestra, clock) = founded();

        orchestra
            .free_schedule_slot(2, Uuid::new_v4(), &clock)
            .unwrap();

        assert!(orchestra.uncommitted_events().is_empty());
    }

    #[test]
    fn test_free_schedule_slot_out_of_range_fails() {
        let (mut orchestra, clock) = founded();

        let result = orchestra.free_schedule_slot(7, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(OrchestraError::OutOfRange { .. })));
    }

    // --- weekly resolution ---

    #[test]
    fn test_run_scheduled_week_adds_practice_minutes() {
        for minutes in [1, 5, 10, 60, 120] {
            let (mut orchestra, clock) = founded();
            schedule(&mut orchestra, &clock, 1, ActivityKind::Practice(practice(minutes)));

            orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

            assert_eq!(orchestra.practice_minutes(), minutes);
        }
    }

    #[test]
    fn test_run_scheduled_week_with_concert_adds_experience() {
        for experience in [100, 1000, 2000, 5000] {
            let (mut orchestra, clock) = founded();
            schedule(
                &mut orchestra,
                &clock,
                1,
                ActivityKind::Concert(concert(0, experience, 0, 0)),
            );

            orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

            assert_eq!(orchestra.experience(), experience);
        }
    }

    #[test]
    fn test_run_scheduled_week_with_concert_applies_revenue_minus_price() {
        // The purchase already charged `price`; the week charges it again.
        for (price, revenue) in [(100, 200), (50, 200), (0, 200), (100, 0), (100, 50)] {
            let (mut orchestra, clock) = founded();
            schedule(
                &mut orchestra,
                &clock,
                1,
                ActivityKind::Concert(concert(price, 0, revenue, 0)),
            );
            let before = orchestra.budget();

            orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

            assert_eq!(before, 1000 - price);
            assert_eq!(orchestra.budget(), before + revenue - price, "price {price}");
        }
    }

    #[test]
    fn test_run_scheduled_week_budget_may_go_negative() {
        let (mut orchestra, clock) = founded();
        schedule(
            &mut orchestra,
            &clock,
            0,
            ActivityKind::Concert(concert(1000, 0, 0, 0)),
        );

        orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.budget(), -1000);
    }

    #[test]
    fn test_buy_trip_with_negative_price_is_rejected_without_change() {
        let (mut orchestra, clock) = founded();

        let result = orchestra.buy_trip(Uuid::new_v4(), trip(i64::MIN, 0), Uuid::new_v4(), &clock);

        match result.unwrap_err() {
            OrchestraError::NegativeAmount { value, .. } => assert_eq!(value, i64::MIN),
            other => panic!("expected NegativeAmount, got {other:?}"),
        }
        assert_eq!(orchestra.budget(), 1000);
        assert!(orchestra.unused_activities().is_empty());
        assert!(orchestra.uncommitted_events().is_empty());
    }

    #[test]
    fn test_negative_amounts_are_rejected_on_every_purchase() {
        let (mut orchestra, clock) = founded();

        let results = [
            orchestra.buy_musician(musician("Refund", -1), Uuid::new_v4(), &clock),
            orchestra.buy_practice(Uuid::new_v4(), practice(-30), Uuid::new_v4(), &clock),
            orchestra.buy_trip(Uuid::new_v4(), trip(10, -5), Uuid::new_v4(), &clock),
            orchestra.buy_concert(
                Uuid::new_v4(),
                concert(10, 5, -20, 0),
                Uuid::new_v4(),
                &clock,
            ),
            orchestra.buy_practice_room(Room::new(5, -100, "Cellar"), Uuid::new_v4(), &clock),
        ];

        for result in results {
            assert!(matches!(
                result,
                Err(OrchestraError::NegativeAmount { .. })
            ));
        }
        assert_eq!(orchestra.budget(), 1000);
        assert!(orchestra.uncommitted_events().is_empty());
    }

    #[test]
    fn test_buy_musician_rejects_charge_that_would_overflow_budget() {
        let clock = fixed_clock();
        let config = OrchestraConfig {
            starting_budget: i64::MIN + 10,
            ..OrchestraConfig::default()
        };
        let mut orchestra = Orchestra::found(
            Uuid::new_v4(),
            "Broke".to_owned(),
            Vec::new(),
            Vec::new(),
            &config,
            Uuid::new_v4(),
            &clock,
        );
        orchestra.clear_uncommitted_events();

        let result = orchestra.buy_musician(musician("Pricey", 100), Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(OrchestraError::Overflow("budget"))));
        assert_eq!(orchestra.budget(), i64::MIN + 10);
        assert!(orchestra.musicians().is_empty());
    }

    #[test]
    fn test_run_scheduled_week_rejects_overflowing_totals_and_keeps_schedule() {
        let (mut orchestra, clock) = founded();
        schedule(
            &mut orchestra,
            &clock,
            0,
            ActivityKind::Practice(practice(i64::MAX)),
        );
        schedule(&mut orchestra, &clock, 1, ActivityKind::Practice(practice(1)));
        orchestra.clear_uncommitted_events();

        let result = orchestra.run_scheduled_week(Uuid::new_v4(), &clock);

        assert!(matches!(
            result,
            Err(OrchestraError::Overflow("practice minutes"))
        ));
        assert_eq!(orchestra.practice_minutes(), 0);
        assert!(orchestra.schedule()[0].is_some());
        assert!(orchestra.schedule()[1].is_some());
        assert!(orchestra.uncommitted_events().is_empty());
    }

    #[test]
    fn test_run_scheduled_week_with_trip_adds_experience() {
        for experience in [1, 50, 99, 200, 1000] {
            let (mut orchestra, clock) = founded();
            schedule(&mut orchestra, &clock, 1, ActivityKind::Trip(trip(1, experience)));

            orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

            assert_eq!(orchestra.experience(), experience);
        }
    }

    #[test]
    fn test_run_scheduled_week_concert_subtracts_required_practice() {
        for (duration, expected) in [(5, 3), (10, 8), (100, 98), (1000, 998)] {
            let (mut orchestra, clock) = founded();
            schedule(&mut orchestra, &clock, 1, ActivityKind::Practice(practice(duration)));
            schedule(&mut orchestra, &clock, 0, ActivityKind::Concert(concert(0, 0, 0, 0)));

            orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

            assert_eq!(orchestra.practice_minutes(), expected);
        }
    }

    #[test]
    fn test_run_scheduled_week_concert_applies_all_effects_in_one_pass() {
        // Arrange
        let (mut orchestra, clock) = founded();
        schedule(&mut orchestra, &clock, 3, ActivityKind::Concert(concert(100, 40, 300, 0)));
        schedule(&mut orchestra, &clock, 5, ActivityKind::Concert(concert(0, 10, 0, 0)));

        // Act
        orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

        // Assert
        assert_eq!(orchestra.experience(), 50);
        assert_eq!(orchestra.budget(), 900 + 200);
        assert_eq!(orchestra.practice_minutes(), -4);
        match &orchestra.uncommitted_events().last().unwrap().kind {
            OrchestraEventKind::WeekResolved(week) => {
                assert_eq!(week.concerts_performed, 2);
                assert_eq!(week.resolved_activity_ids.len(), 2);
            }
            other => panic!("expected WeekResolved, got {other:?}"),
        }
    }

    #[test]
    fn test_run_scheduled_week_clears_schedule_and_consumes_activities() {
        let (mut orchestra, clock) = founded();
        let trip_id = schedule(&mut orchestra, &clock, 1, ActivityKind::Trip(trip(1, 1)));
        let practice_id = schedule(&mut orchestra, &clock, 2, ActivityKind::Practice(practice(1)));

        orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

        assert!(orchestra.schedule().iter().all(Option::is_none));
        assert_eq!(orchestra.schedule_size(), 7);
        assert!(!orchestra.unused_activities().contains_key(&trip_id));
        assert!(!orchestra.unused_activities().contains_key(&practice_id));
    }

    #[test]
    fn test_run_scheduled_week_on_empty_schedule_changes_no_metrics() {
        let (mut orchestra, clock) = founded();

        orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.budget(), 1000);
        assert_eq!(orchestra.experience(), 0);
        assert_eq!(orchestra.practice_minutes(), 0);
        assert_eq!(
            orchestra.uncommitted_events()[0].event_type(),
            WEEK_RESOLVED_EVENT_TYPE
        );
    }

    #[test]
    fn test_run_scheduled_week_leaves_room_and_roster_alone() {
        let (mut orchestra, clock) = founded();
        orchestra.buy_musician(musician("Kept", 0), Uuid::new_v4(), &clock).unwrap();
        let room = orchestra.practice_room().clone();
        schedule(&mut orchestra, &clock, 0, ActivityKind::Practice(practice(30)));

        orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.musicians().len(), 1);
        assert_eq!(orchestra.practice_room(), &room);
    }

    #[test]
    fn test_trip_week_end_to_end() {
        // Arrange
        let (mut orchestra, clock) = founded();
        let id = Uuid::new_v4();

        // Act + Assert
        orchestra
            .buy_trip(id, trip(100, 50), Uuid::new_v4(), &clock)
            .unwrap();
        assert_eq!(orchestra.budget(), 900);
        assert!(orchestra.unused_activities().contains_key(&id));

        orchestra
            .update_schedule(1, id, Uuid::new_v4(), &clock)
            .unwrap();
        assert_eq!(
            orchestra.schedule()[1].as_ref().map(|activity| activity.id),
            Some(id)
        );
        assert!(orchestra.unused_activities().is_empty());

        orchestra.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();
        assert_eq!(orchestra.experience(), 50);
        assert!(orchestra.schedule().iter().all(Option::is_none));
    }

    // --- replay ---

    #[test]
    fn test_replaying_recorded_events_rebuilds_the_same_state() {
        // Arrange
        let clock = fixed_clock();
        let orchestra_id = Uuid::new_v4();
        let mut live = Orchestra::found(
            orchestra_id,
            "Live".to_owned(),
            Vec::new(),
            Vec::new(),
            &OrchestraConfig::default(),
            Uuid::new_v4(),
            &clock,
        );
        live.buy_musician(musician("Ada", 120), Uuid::new_v4(), &clock).unwrap();
        let kept = Uuid::new_v4();
        live.buy_practice(kept, practice(45), Uuid::new_v4(), &clock).unwrap();
        schedule(&mut live, &clock, 0, ActivityKind::Concert(concert(80, 20, 150, 0)));
        schedule(&mut live, &clock, 2, ActivityKind::Practice(practice(30)));
        live.run_scheduled_week(Uuid::new_v4(), &clock).unwrap();
        live.buy_practice_room(Room::new(4, 10, "Hall"), Uuid::new_v4(), &clock)
            .unwrap();
        live.rename("Renamed".to_owned(), Uuid::new_v4(), &clock);
        let first = schedule(&mut live, &clock, 3, ActivityKind::Trip(trip(15, 4)));
        let replacement = Uuid::new_v4();
        live.buy_practice(replacement, practice(20), Uuid::new_v4(), &clock)
            .unwrap();
        live.update_schedule(3, replacement, Uuid::new_v4(), &clock)
            .unwrap();
        schedule(&mut live, &clock, 5, ActivityKind::Practice(practice(10)));
        live.free_schedule_slot(5, Uuid::new_v4(), &clock).unwrap();

        // Act
        let mut replayed = Orchestra::new(orchestra_id);
        replayed.replay(live.uncommitted_events());

        // Assert
        assert_eq!(replayed.name(), live.name());
        assert_eq!(replayed.budget(), live.budget());
        assert_eq!(replayed.experience(), live.experience());
        assert_eq!(replayed.practice_minutes(), live.practice_minutes());
        assert_eq!(replayed.musicians(), live.musicians());
        assert_eq!(replayed.practice_room(), live.practice_room());
        assert_eq!(replayed.unused_activities(), live.unused_activities());
        assert_eq!(replayed.schedule(), live.schedule());
        #[allow(clippy::cast_possible_wrap)]
        let expected_version = live.uncommitted_events().len() as i64;
        assert_eq!(replayed.version(), expected_version);
        assert!(replayed.unused_activities().contains_key(&kept));
        assert_eq!(replayed.name(), "Renamed");
        assert!(replayed.unused_activities().contains_key(&first));
        assert_eq!(
            replayed.schedule()[3].as_ref().map(|activity| activity.id),
            Some(replacement)
        );
        assert!(replayed.schedule()[5].is_none());
        for event_type in [
            ORCHESTRA_RENAMED_EVENT_TYPE,
            ACTIVITY_UNSCHEDULED_EVENT_TYPE,
        ] {
            assert!(
                live.uncommitted_events()
                    .iter()
                    .any(|event| event.event_type() == event_type)
            );
        }
    }

    #[test]
    fn test_clear_uncommitted_events_advances_version() {
        let (mut orchestra, clock) = founded();
        assert_eq!(orchestra.version(), 1);

        orchestra.buy_practice(Uuid::new_v4(), practice(1), Uuid::new_v4(), &clock).unwrap();
        orchestra.clear_uncommitted_events();
        orchestra.buy_practice(Uuid::new_v4(), practice(1), Uuid::new_v4(), &clock).unwrap();

        assert_eq!(orchestra.version(), 2);
        assert_eq!(orchestra.uncommitted_events()[0].metadata().sequence_number, 3);
    }
}
