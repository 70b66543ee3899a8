//! Application layer: load, execute, persist.

pub mod command_handlers;
pub mod query_handlers;
