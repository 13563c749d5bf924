//! Extruder action machine
//!
//! Load, unload and clean run as a series of short moves issued from the
//! poll loop, so the display can stop them at any time.

use a30t_protocol::mix::MIX_CHANNELS;

use super::events::ExtruderEvent;
use crate::time::elapsed;

/// Length of one load/unload move
pub const EXTRUDE_DISTANCE_MM: f32 = 1.0;

/// Feedrate of one load/unload move; one move lasts one default period
pub const EXTRUDE_FEEDRATE_MM_S: f32 = 1.0;

/// What the extruder is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtruderAction {
    #[default]
    Idle,
    Loading,
    Unloading,
    /// `next_channel` gets 100 % of the mix at the next switch
    Cleaning { next_channel: u8 },
}

impl ExtruderAction {
    /// Check if the extruder is being driven
    pub fn is_active(&self) -> bool {
        !matches!(self, ExtruderAction::Idle)
    }

    /// Process an event and return the next action
    pub fn transition(self, event: ExtruderEvent) -> Self {
        match event {
            ExtruderEvent::Load => ExtruderAction::Loading,
            ExtruderEvent::Unload => ExtruderAction::Unloading,
            ExtruderEvent::Clean => ExtruderAction::Cleaning { next_channel: 0 },
            ExtruderEvent::Stop => ExtruderAction::Idle,
        }
    }
}

/// Work for the host, produced by [`ExtruderMachine::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtruderTick {
    /// Put the whole mix on this channel
    pub select_channel: Option<u8>,
    /// Extrude this far (negative retracts)
    pub extrude_mm: Option<f32>,
}

/// Extruder action with its timers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtruderMachine {
    action: ExtruderAction,
    /// `None` means due on the next tick
    next_extrude: Option<u32>,
    next_switch: Option<u32>,
}

impl ExtruderMachine {
    pub const fn new() -> Self {
        Self {
            action: ExtruderAction::Idle,
            next_extrude: None,
            next_switch: None,
        }
    }

    pub fn action(&self) -> ExtruderAction {
        self.action
    }

    /// Apply an event; starting an action makes its first move due at once
    pub fn handle(&mut self, event: ExtruderEvent) {
        self.action = self.action.transition(event);
        self.next_extrude = None;
        self.next_switch = None;
    }

    /// Advance timers and report what the host should do now
    pub fn tick(&mut self, now_ms: u32, extrude_period_ms: u32, switch_period_ms: u32) -> ExtruderTick {
        let mut out = ExtruderTick::default();

        let direction = match self.action {
            ExtruderAction::Idle => return out,
            ExtruderAction::Unloading => -1.0,
            ExtruderAction::Loading => 1.0,
            ExtruderAction::Cleaning { next_channel } => {
                if due(self.next_switch, now_ms) {
                    out.select_channel = Some(next_channel);
                    self.action = ExtruderAction::Cleaning {
                        next_channel: (next_channel + 1) % MIX_CHANNELS as u8,
                    };
                    self.next_switch = Some(now_ms.wrapping_add(switch_period_ms));
                }
                1.0
            }
        };

        if due(self.next_extrude, now_ms) {
            out.extrude_mm = Some(direction * EXTRUDE_DISTANCE_MM);
            self.next_extrude = Some(now_ms.wrapping_add(extrude_period_ms));
        }

        out
    }
}

fn due(deadline: Option<u32>, now_ms: u32) -> bool {
    deadline.map_or(true, |d| elapsed(now_ms, d))
}
