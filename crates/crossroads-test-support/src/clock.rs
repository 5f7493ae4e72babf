//! Frozen clock for event timestamps.

use chrono::{DateTime, Utc};
use crossroads_core::clock::Clock;

/// Stamps every interaction and progress event with the same instant, so
/// recorded events compare equal across runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
