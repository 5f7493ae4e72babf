//! Crossroads — narrative sequence engine.
//!
//! Plays a situation's scripted steps on a cancellable timeline, composes the
//! visible scene for each step, and drives the decision, confirmation and
//! outcome loop of one conflict situation.

pub mod application;
pub mod domain;
