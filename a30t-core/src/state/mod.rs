//! Adapter state
//!
//! Everything the adapter remembers between poll cycles lives in one
//! [`AdapterState`] owned by the dispatcher.

pub mod events;
pub mod extruder;

pub use events::ExtruderEvent;
pub use extruder::{ExtruderAction, ExtruderMachine, ExtruderTick};

use a30t_protocol::CommandKind;

/// Cross-command state of the adapter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdapterState {
    /// When the next status cycle is due (ms)
    pub next_status_due: u32,
    /// `L1`/`L24` are withheld while a wizard step moves the printer
    pub axis_telemetry_suppressed: bool,
    /// Most recent non-Unknown command kind
    pub active_command: CommandKind,
    /// Auto leveling switch as the display sees it
    pub auto_level_shadow: bool,
    pub extruder: ExtruderMachine,
    /// Last absolute babystep value sent by the display
    pub babystep_reference: f32,
    /// Host asked the adapter to leave inbound lines unread
    pub input_paused: bool,
}

impl Default for AdapterState {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterState {
    pub const fn new() -> Self {
        Self {
            next_status_due: 0,
            axis_telemetry_suppressed: false,
            active_command: CommandKind::Unknown,
            auto_level_shadow: true,
            extruder: ExtruderMachine::new(),
            babystep_reference: 0.0,
            input_paused: false,
        }
    }

    /// Record an inbound command kind before it is dispatched
    ///
    /// Unknown lines are ignored so they do not end a command group. A kind
    /// different from the active one lifts axis telemetry suppression.
    pub fn track_command(&mut self, kind: CommandKind) {
        if kind == CommandKind::Unknown {
            return;
        }
        if self.axis_telemetry_suppressed && self.active_command != kind {
            self.axis_telemetry_suppressed = false;
        }
        self.active_command = kind;
    }
}
