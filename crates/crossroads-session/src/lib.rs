//! Crossroads — Session & Progress.
//!
//! Tracks which situations have an accepted answer, reports completion to
//! the host, and lays out the map and legend markers.

pub mod application;
pub mod domain;
