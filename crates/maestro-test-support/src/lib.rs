//! Shared test doubles for the Maestro orchestra engine.

mod clock;
mod repository;

pub use clock::{FixedClock, fixed_clock};
pub use repository::{
    EmptyEventRepository, FailingEventRepository, InMemoryEventRepository,
    RecordingEventRepository,
};
