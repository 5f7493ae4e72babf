//! Wall-clock abstraction used to stamp domain events.
//!
//! Playback timing never reads this clock: the timeline advances only by the
//! elapsed deltas the host's animation loop reports.

use chrono::{DateTime, Utc};

/// Source of event timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
