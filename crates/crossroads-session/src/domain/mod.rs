//! Progress domain: the playthrough aggregate, its commands and events.

pub mod aggregates;
pub mod commands;
pub mod events;
