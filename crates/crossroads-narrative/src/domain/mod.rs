//! Narrative domain: timing, scene composition, timeline playback and the
//! interaction aggregate.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod scene;
pub mod timeline;
pub mod timing;
