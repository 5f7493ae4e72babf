//! Content application services.

pub mod loader;
