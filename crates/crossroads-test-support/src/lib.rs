//! Shared test mocks and fixtures for the Crossroads crates.

mod clock;
pub mod fixtures;
mod reporter;

pub use clock::FixedClock;
pub use reporter::{FailingReporter, RecordingReporter};
