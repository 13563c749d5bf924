//! Geeetech A30T Display Protocol
//!
//! This crate implements the line protocol spoken by the A30T touch display.
//! The display sends a mix of plain G-code and vendor pseudo-commands (`L…`
//! and high `M…` numbers); the printer answers with periodic status
//! telegrams.
//!
//! # Protocol Overview
//!
//! Lines are ASCII, optionally wrapped in a checksum envelope:
//! ```text
//! ┌────────┬──────────────┬───┬──────────┬──────┐
//! │ "N-0 " │ TEXT         │ * │ CHECKSUM │ CRLF │
//! └────────┴──────────────┴───┴──────────┴──────┘
//! ```
//!
//! Inbound: [`frame::decode_line`] → [`command::Command::parse`].
//! Outbound: [`telegram`] builders → [`frame::encode_line`].

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod mix;
pub mod params;
pub mod status;
pub mod telegram;

pub use command::{classify, Command, CommandKind, Payload, CATALOG};
pub use frame::{
    decode_line, encode_line, DecodedLine, FrameError, MAX_ENCODED_LINE, MAX_INBOUND_LINE,
    MAX_LINE_TEXT,
};
pub use mix::MixRatio;
pub use params::{tokenize, Param, Parameters};
pub use status::{FilamentSensor, PrintJobFlags, PrintStatus};
pub use telegram::{SettingsGroup, SettingsSnapshot, Telegram, TelegramError};
