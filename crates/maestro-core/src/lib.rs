//! Maestro Core — shared domain abstractions.
//!
//! Traits and types the orchestra engine is built on: aggregates that
//! record events, the clock they timestamp with, and the repository seam a
//! host plugs storage into. Nothing here performs I/O.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
