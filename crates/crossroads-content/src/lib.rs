//! Crossroads — content context.
//!
//! Owns the read-only script data of every conflict situation, the resolved
//! translation table, and loading/validation of the game-data bundle that a
//! host supplies (JSON) or that ships alongside the server (JSON or YAML).

pub mod application;
pub mod domain;
