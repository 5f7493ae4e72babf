//! Narrative application layer.

pub mod command_handlers;
pub mod query_handlers;
