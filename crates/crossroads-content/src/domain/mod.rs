//! Content domain types.

pub mod bundle;
pub mod situation;
pub mod translations;
