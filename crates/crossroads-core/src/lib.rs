//! Crossroads Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the content,
//! narrative and progress contexts depend on. It contains no I/O.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod report;
