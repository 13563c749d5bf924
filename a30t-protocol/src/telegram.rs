//! Outbound telegram builders
//!
//! Every telegram is formatted into its own bounded [`Telegram`] buffer.
//! Framing (marker, checksum, CRLF) is added later by
//! [`encode_line`](crate::frame::encode_line).

use core::fmt::{self, Display, Write};

use crate::frame::MAX_LINE_TEXT;
use crate::mix::MixRatio;
use crate::status::{FilamentSensor, PrintStatus};

/// One outbound telegram, without framing
pub type Telegram = heapless::String<MAX_LINE_TEXT>;

/// Longest file name shown in the print info telegram
pub const MAX_FILE_NAME: usize = 32;

/// Fan 2 speed; the A30T has no second part fan but the display wants a value
pub const FAN2_PLACEHOLDER: u8 = 50;

/// Telegram formatting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelegramError {
    /// Formatted text exceeds [`MAX_LINE_TEXT`]
    Overflow,
}

fn build(args: fmt::Arguments<'_>) -> Result<Telegram, TelegramError> {
    let mut out = Telegram::new();
    out.write_fmt(args).map_err(|_| TelegramError::Overflow)?;
    debug_assert!(out.len() <= MAX_LINE_TEXT);
    Ok(out)
}

/// Cut `text` to at most `max` bytes on a char boundary
fn clip(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Negate without producing `-0`
fn negate(value: f32) -> f32 {
    0.0 - value
}

/// `L1`: logical tool position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisInfo {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Current feedrate in mm/s
    pub feedrate: u8,
}

impl AxisInfo {
    pub fn to_telegram(&self) -> Result<Telegram, TelegramError> {
        build(format_args!(
            "L1 X{:.3} Y{:.3} Z{:.3} F{}",
            self.x, self.y, self.z, self.feedrate
        ))
    }
}

/// Actual and target temperature of one heater
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterReading {
    pub current: f32,
    pub target: f32,
}

impl HeaterReading {
    /// Heating flag shown next to the temperatures
    pub fn active(&self) -> bool {
        self.target > 0.0
    }
}

impl Display for HeaterReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} /{:.1} /{}",
            self.current,
            self.target,
            self.active() as u8
        )
    }
}

/// `L2`: temperatures, fan and speed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureInfo {
    pub bed: HeaterReading,
    /// The single mixing hotend, reported for T0, T1 and T2
    pub hotend: HeaterReading,
    pub media_present: bool,
    /// Part fan in percent
    pub fan_percent: u8,
    /// Feedrate override in percent
    pub speed_percent: u8,
    /// Current feedrate in mm/s
    pub feedrate: u8,
}

impl TemperatureInfo {
    /// `SD:` field; the display expects 0 when media IS present
    pub fn sd_flag(&self) -> u8 {
        if self.media_present {
            0
        } else {
            1
        }
    }

    pub fn to_telegram(&self) -> Result<Telegram, TelegramError> {
        let e = &self.hotend;
        build(format_args!(
            "L2 B:{} T0:{} T1:{} T2:{} SD:{} F0:{} F2:{} R:{} FR:{}",
            self.bed,
            e,
            e,
            e,
            self.sd_flag(),
            self.fan_percent,
            FAN2_PLACEHOLDER,
            self.speed_percent,
            self.feedrate
        ))
    }
}

/// `L3`: print job information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintInfo<'a> {
    pub status: PrintStatus,
    /// Any stepper is energized
    pub motors_enabled: bool,
    pub filament: FilamentSensor,
    /// Auto leveling switch as shown on the display
    pub auto_level: bool,
    pub mix: MixRatio,
    /// Current media file name, clipped to [`MAX_FILE_NAME`]
    pub file_name: &'a str,
    pub progress_percent: u8,
    pub elapsed_s: u32,
}

impl PrintInfo<'_> {
    pub fn to_telegram(&self) -> Result<Telegram, TelegramError> {
        build(format_args!(
            "L3 PS:{} VL:0 MT:{} FT:{} AL:{} ST:1 WF:0 MR:{} FN:{} PG:{} TM:{} LA:0 LC:0",
            self.status.code(),
            self.motors_enabled as u8,
            self.filament.code(),
            self.auto_level as u8,
            self.mix.pack(),
            clip(self.file_name, MAX_FILE_NAME),
            self.progress_percent,
            self.elapsed_s
        ))
    }
}

/// `L9`: printer identity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirmwareInfo<'a> {
    pub device_name: &'a str,
    pub model: &'a str,
    pub serial: &'a str,
    pub firmware_version: &'a str,
    /// Build volume X, Y, Z in mm
    pub build_volume: [f32; 3],
    pub hardware: &'a str,
}

impl FirmwareInfo<'_> {
    pub fn to_telegram(&self) -> Result<Telegram, TelegramError> {
        let [x, y, z] = self.build_volume;
        build(format_args!(
            "L9 DN:{};DM:{};SN:{};FV:{};PV:{:.2} x {:.2} x {:.2};HV:{};",
            self.device_name, self.model, self.serial, self.firmware_version, x, y, z, self.hardware
        ))
    }
}

/// Groups of the `L24` settings telegram, selected by `P`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsGroup {
    StepsPerMm,
    Feedrate,
    Acceleration,
    Jerk,
    Babystep,
    DoubleZ,
}

impl SettingsGroup {
    /// Groups in the order they are sent during a status cycle
    pub const ALL: [SettingsGroup; 6] = [
        SettingsGroup::StepsPerMm,
        SettingsGroup::Feedrate,
        SettingsGroup::Acceleration,
        SettingsGroup::Jerk,
        SettingsGroup::Babystep,
        SettingsGroup::DoubleZ,
    ];

    /// Wire number of the group (there is no group 4)
    pub fn number(self) -> u8 {
        match self {
            SettingsGroup::StepsPerMm => 0,
            SettingsGroup::Feedrate => 1,
            SettingsGroup::Acceleration => 2,
            SettingsGroup::Jerk => 3,
            SettingsGroup::Babystep => 5,
            SettingsGroup::DoubleZ => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.number() == number)
    }
}

/// Motion settings shown on the display's settings pages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsSnapshot {
    /// X, Y, Z, E
    pub steps_per_mm: [f32; 4],
    /// X, Y, Z, E in mm/s
    pub max_feedrate: [f32; 4],
    pub min_feedrate: f32,
    pub min_travel_feedrate: f32,
    /// Print acceleration in mm/s²
    pub acceleration: f32,
    pub retract_feedrate: f32,
    /// X, Y, Z, E in mm/s²
    pub max_acceleration: [u32; 4],
    /// X, Y, Z, E in mm/s
    pub jerk: [f32; 4],
    pub babystep: f32,
    /// Signed Z2 endstop adjustment
    pub z2_adjust: f32,
}

impl SettingsSnapshot {
    /// Build the `L24` telegram of one group
    pub fn to_telegram(&self, group: SettingsGroup) -> Result<Telegram, TelegramError> {
        let p = group.number();
        match group {
            SettingsGroup::StepsPerMm => {
                let [a, b, c, d] = self.steps_per_mm;
                build(format_args!("L24 P{} A{:.2} B{:.2} C{:.2} D{:.2}", p, a, b, c, d))
            }
            SettingsGroup::Feedrate => {
                let [a, b, c, d] = self.max_feedrate.map(|v| v as i32);
                build(format_args!(
                    "L24 P{} A{} B{} C{} D{} E{} F{}",
                    p,
                    a,
                    b,
                    c,
                    d,
                    (self.min_feedrate as i32).max(1),
                    (self.min_travel_feedrate as i32).max(1)
                ))
            }
            SettingsGroup::Acceleration => {
                let [c, d, e, f] = self.max_acceleration;
                build(format_args!(
                    "L24 P{} A{} B{} C{} D{} E{} F{}",
                    p, self.acceleration as i32, self.retract_feedrate as i32, c, d, e, f
                ))
            }
            SettingsGroup::Jerk => {
                let [a, b, c, d] = self.jerk;
                build(format_args!("L24 P{} A{:.2} B{:.2} C{:.2} D{:.2}", p, a, b, c, d))
            }
            SettingsGroup::Babystep => build(format_args!("L24 P{} A{:.2}", p, self.babystep)),
            SettingsGroup::DoubleZ => {
                let raise = if self.z2_adjust > 0.0 { self.z2_adjust } else { 0.0 };
                let lower = if self.z2_adjust < 0.0 {
                    negate(self.z2_adjust)
                } else {
                    0.0
                };
                build(format_args!("L24 P{} A{:.2} B{:.2}", p, raise, lower))
            }
        }
    }
}

/// `L10`: manual leveling Z offset, the negated home offset
pub fn z_offset(home_offset_z: f32) -> Result<Telegram, TelegramError> {
    build(format_args!("L10 S{:.2}", negate(home_offset_z)))
}

/// `L1 Z` + `L11`: probe Z offset
///
/// The display only updates the probe offset page after it also received an
/// `L1` carrying the same value, so both lines are returned in send order.
pub fn probe_offset(offset_z: f32) -> Result<[Telegram; 2], TelegramError> {
    Ok([
        build(format_args!("L1 Z{:.2}", offset_z))?,
        build(format_args!("L11 P0 S{:.2}", offset_z))?,
    ])
}

/// `L14`: status line text, clipped to fit one telegram
pub fn message(text: &str) -> Result<Telegram, TelegramError> {
    build(format_args!("L14 {}", clip(text, MAX_LINE_TEXT - 4)))
}

/// `L18`: predefined user message
pub fn user_message(code: u16) -> Result<Telegram, TelegramError> {
    build(format_args!("L18 P26 S{}", code))
}

/// Plain acknowledgement such as `M2107 ok`
pub fn ack(text: &str) -> Result<Telegram, TelegramError> {
    build(format_args!("{}", text))
}
