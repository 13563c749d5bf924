//! Board-agnostic adapter between the Geeetech A30T display and printer
//! firmware
//!
//! This crate contains everything that does not depend on a specific
//! printer firmware or board:
//!
//! - Host collaborator traits (queue, motion, thermal, print job, mixer)
//! - Adapter configuration and its persistent encoding
//! - Extruder action state machine
//! - Command dispatcher and leveling wizards
//! - Periodic status telegrams
//! - Serial display link and the poll loop

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod link;
pub mod state;
pub mod status;
pub mod time;
pub mod traits;

#[cfg(test)]
mod testing;

pub use adapter::Adapter;
pub use config::AdapterConfig;
pub use dispatch::Dispatcher;
pub use error::LinkError;
pub use link::{DisplayLink, TelegramSink};
pub use state::AdapterState;
pub use traits::Host;
