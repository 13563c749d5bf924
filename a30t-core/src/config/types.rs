//! Configuration type definitions
//!
//! These types describe how the adapter talks to the display and where the
//! leveling wizard moves the nozzle. Configuration can be persisted as
//! postcard-serialized binary data, see [`super::store`].

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of identity strings
pub const MAX_LABEL_LEN: usize = 16;

/// Status and extruder cadence
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Period of the status telegram cycle
    pub status_period_ms: u32,
    /// Pause after every outbound line
    pub settle_delay_ms: u32,
    /// Period of the 1 mm load/unload extrusions
    pub extrude_period_ms: u32,
    /// Dwell on each channel while cleaning
    pub extruder_switch_period_ms: u32,
    /// Upper bound of inbound lines handled per poll
    pub max_lines_per_poll: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            status_period_ms: 1000,
            settle_delay_ms: 20,
            extrude_period_ms: 1000,
            extruder_switch_period_ms: 10_000,
            max_lines_per_poll: 10,
        }
    }
}

/// Manual leveling geometry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelingConfig {
    /// Rear right, rear left, front left, front right (X, Y in mm)
    pub corners: [[f32; 2]; 4],
    /// Bed center (X, Y in mm)
    pub center: [f32; 2],
    /// Z height for travel between leveling points
    pub z_hop_mm: f32,
    /// Feedrate of the Z moves back to the leveling height
    pub z_feedrate_mm_s: f32,
    /// Home offset change of the 0.5 mm buttons
    pub coarse_step_mm: f32,
    /// Home offset change of the 0.05 mm buttons
    pub fine_step_mm: f32,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            corners: [[290.0, 290.0], [30.0, 290.0], [30.0, 30.0], [290.0, 30.0]],
            center: [160.0, 160.0],
            z_hop_mm: 5.0,
            z_feedrate_mm_s: 200.0,
            coarse_step_mm: 0.5,
            fine_step_mm: 0.05,
        }
    }
}

/// Telegram options
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetryConfig {
    /// Send the `L24` settings groups in every status cycle
    pub settings_in_status: bool,
    /// Wrap outbound lines in `N-0 …*<checksum>`
    pub checksum_outbound: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            settings_in_status: true,
            checksum_outbound: true,
        }
    }
}

/// Identity reported in the `L9` firmware info telegram
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentityConfig {
    pub device_name: String<MAX_LABEL_LEN>,
    pub model: String<MAX_LABEL_LEN>,
    pub serial: String<MAX_LABEL_LEN>,
    pub hardware: String<MAX_LABEL_LEN>,
    /// X, Y, Z in mm
    pub build_volume: [f32; 3],
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            device_name: label("Geeetech"),
            model: label("A30T"),
            serial: label("000000"),
            hardware: label("GTM32_103_V1"),
            build_volume: [320.0, 320.0, 420.0],
        }
    }
}

/// Complete adapter configuration
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdapterConfig {
    pub timing: TimingConfig,
    pub leveling: LevelingConfig,
    pub telemetry: TelemetryConfig,
    pub identity: IdentityConfig,
}

/// Build a label, dropping whatever does not fit
pub fn label<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = TimingConfig::default();
        assert_eq!(timing.status_period_ms, 1000);
        assert_eq!(timing.settle_delay_ms, 20);
        assert_eq!(timing.max_lines_per_poll, 10);
    }

    #[test]
    fn test_default_identity() {
        let identity = IdentityConfig::default();
        assert_eq!(identity.model.as_str(), "A30T");
        assert_eq!(identity.build_volume, [320.0, 320.0, 420.0]);
    }

    #[test]
    fn test_label_truncates() {
        let text: String<4> = label("Geeetech");
        assert_eq!(text.as_str(), "Geee");
    }
}
