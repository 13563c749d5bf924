//! Configuration types
//!
//! Board-agnostic adapter configuration, optionally stored as postcard
//! binary data.

#[cfg(feature = "serde")]
pub mod store;
pub mod types;

pub use types::*;
