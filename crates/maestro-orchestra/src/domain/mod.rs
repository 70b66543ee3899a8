//! Domain model for the orchestra engine.

pub mod aggregates;
pub mod commands;
pub mod errors;
pub mod events;
pub mod values;
