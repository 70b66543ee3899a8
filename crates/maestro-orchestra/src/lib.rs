//! Maestro — the Orchestra Engine.
//!
//! Holds one orchestra's mutable game state (budget, roster, practice room,
//! purchased activities, weekly schedule, progress metrics) and enforces the
//! rules for buying, scheduling and resolving a week.

pub mod application;
pub mod config;
pub mod domain;
