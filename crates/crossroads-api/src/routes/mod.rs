//! Route modules.

pub mod health;
pub mod map;
pub mod progress;
pub mod session;
