//! Bed leveling wizards
//!
//! `M2107` walks the nozzle over the bed for manual leveling with the home
//! offset as paper gauge. `M2120` drives the BLTouch and the probe offset
//! page. Moves block until the printer stopped.

use a30t_protocol::{telegram, Param, Parameters};

use super::Context;
use crate::config::LevelingConfig;
use crate::link::TelegramSink;
use crate::traits::Host;

/// Largest probe offset step of the display's height selector
///
/// The display labels it as the coarse step; 10 mm is what it asks for.
pub const COARSE_HEIGHT_STEP_MM: f32 = 10.0;

/// Acknowledgement after a leveling point was reached
pub const MOVE_ACK: &str = "M2107 ok";

/// Acknowledgement after the offset was saved
pub const SAVE_ACK: &str = "M2107 save success";

/// Manual leveling positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelingPoint {
    RearRight,
    RearLeft,
    FrontLeft,
    FrontRight,
    Center,
}

/// Size of a manual Z adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdjustStep {
    Coarse,
    Fine,
}

impl AdjustStep {
    pub fn millimeters(self, leveling: &LevelingConfig) -> f32 {
        match self {
            AdjustStep::Coarse => leveling.coarse_step_mm,
            AdjustStep::Fine => leveling.fine_step_mm,
        }
    }
}

/// One `M2107` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManualLevelingStep {
    /// Home and park the nozzle at the current offset
    Start,
    MoveTo(LevelingPoint),
    /// Move the nozzle up, lowering the home offset
    Raise(AdjustStep),
    /// Move the nozzle down, raising the home offset
    Lower(AdjustStep),
    Save,
}

impl ManualLevelingStep {
    /// Parse the `S` parameter; `S10` is checked before the leading digit
    pub fn parse(params: &Parameters<'_>) -> Option<Self> {
        if params.get(Param::S) == Some("10") {
            return Some(Self::Raise(AdjustStep::Fine));
        }
        let step = match params.leading_digit(Param::S)? {
            0 => Self::Start,
            1 => Self::MoveTo(LevelingPoint::RearRight),
            2 => Self::MoveTo(LevelingPoint::RearLeft),
            3 => Self::MoveTo(LevelingPoint::FrontLeft),
            4 => Self::MoveTo(LevelingPoint::FrontRight),
            5 => Self::MoveTo(LevelingPoint::Center),
            6 => Self::Raise(AdjustStep::Coarse),
            7 => Self::Lower(AdjustStep::Coarse),
            8 => Self::Save,
            9 => Self::Lower(AdjustStep::Fine),
            _ => return None,
        };
        Some(step)
    }
}

/// BLTouch pin requests (`M2120 P1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbePin {
    Stow,
    Deploy,
    /// Clear the alarm state; also the fallback for unknown digits
    AlarmRelease,
}

impl ProbePin {
    pub fn from_digit(digit: Option<u8>) -> Self {
        match digit {
            Some(0) => ProbePin::Stow,
            Some(1) => ProbePin::Deploy,
            _ => ProbePin::AlarmRelease,
        }
    }

    /// G-code the host executes for this request
    pub fn gcode(self) -> &'static str {
        match self {
            ProbePin::Stow => "M402",
            ProbePin::Deploy => "M401",
            ProbePin::AlarmRelease => "M280 P0 S160",
        }
    }
}

/// Step size of the probe offset page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeightStep {
    Coarse,
    Millimeter,
    Tenth,
    Fine,
}

impl HeightStep {
    /// `S0` coarse, `S1` 1 mm, `S2` 0.1 mm, anything else 0.05 mm
    pub fn from_digit(digit: Option<u8>) -> Self {
        match digit {
            Some(0) => HeightStep::Coarse,
            Some(1) => HeightStep::Millimeter,
            Some(2) => HeightStep::Tenth,
            _ => HeightStep::Fine,
        }
    }

    pub fn millimeters(self) -> f32 {
        match self {
            HeightStep::Coarse => COARSE_HEIGHT_STEP_MM,
            HeightStep::Millimeter => 1.0,
            HeightStep::Tenth => 0.1,
            HeightStep::Fine => 0.05,
        }
    }
}

/// One `M2120` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutoLevelAction {
    /// `P0`: auto leveling switch on the display
    SetSwitch(bool),
    /// `P1`: BLTouch pin control
    Probe(ProbePin),
    /// `P2`: probe once at the bed center
    ProbeCenter,
    /// `P3`: raise the nozzle relative to the probe
    RaiseOffset(HeightStep),
    /// `P4`: lower the nozzle relative to the probe
    LowerOffset(HeightStep),
    /// `P5`: store the probe offset
    Save,
    /// `P6`: home and run the leveling routine
    Start,
}

impl AutoLevelAction {
    pub fn parse(params: &Parameters<'_>) -> Option<Self> {
        let s = params.leading_digit(Param::S);
        let action = match params.leading_digit(Param::P)? {
            0 => Self::SetSwitch(s == Some(1)),
            1 => Self::Probe(ProbePin::from_digit(s)),
            2 => Self::ProbeCenter,
            3 => Self::RaiseOffset(HeightStep::from_digit(s)),
            4 => Self::LowerOffset(HeightStep::from_digit(s)),
            5 => Self::Save,
            6 => Self::Start,
            _ => return None,
        };
        Some(action)
    }
}

/// `M2107`: manual leveling wizard
pub(super) fn manual<H: Host, S: TelegramSink>(
    ctx: &mut Context<'_, H, S>,
    params: &Parameters<'_>,
) -> Result<(), S::Error> {
    let config = ctx.config;
    let leveling = &config.leveling;

    match ManualLevelingStep::parse(params) {
        Some(ManualLevelingStep::Start) => {
            ctx.state.axis_telemetry_suppressed = true;
            send_z_offset(ctx)?;
            ctx.host.home_if_needed();
            let z = 0.0 - ctx.host.home_offset_z();
            ctx.host.move_to_z(z, Some(leveling.z_feedrate_mm_s));
        }
        Some(ManualLevelingStep::MoveTo(point)) => {
            let [x, y] = match point {
                LevelingPoint::RearRight => leveling.corners[0],
                LevelingPoint::RearLeft => leveling.corners[1],
                LevelingPoint::FrontLeft => leveling.corners[2],
                LevelingPoint::FrontRight => leveling.corners[3],
                LevelingPoint::Center => leveling.center,
            };
            ctx.host.move_to_z(leveling.z_hop_mm, None);
            ctx.host.move_to_xy(x, y);
            let z = 0.0 - ctx.host.home_offset_z();
            ctx.host.move_to_z(z, None);
            ctx.sink.send(&telegram::ack(MOVE_ACK)?)?;
        }
        Some(ManualLevelingStep::Raise(step)) => adjust_home_offset(ctx, -step.millimeters(leveling)),
        Some(ManualLevelingStep::Lower(step)) => adjust_home_offset(ctx, step.millimeters(leveling)),
        Some(ManualLevelingStep::Save) => {
            ctx.host.save();
            ctx.sink.send(&telegram::ack(SAVE_ACK)?)?;
        }
        None => debug!("M2107 S{:?} not handled", params.get(Param::S)),
    }

    send_z_offset(ctx)
}

fn adjust_home_offset<H: Host, S>(ctx: &mut Context<'_, H, S>, delta_mm: f32) {
    let offset = ctx.host.home_offset_z() + delta_mm;
    ctx.host.set_home_offset_z(offset);
    ctx.host
        .move_to_z(0.0 - offset, Some(ctx.config.leveling.z_feedrate_mm_s));
}

fn send_z_offset<H: Host, S: TelegramSink>(ctx: &mut Context<'_, H, S>) -> Result<(), S::Error> {
    let line = telegram::z_offset(ctx.host.home_offset_z())?;
    ctx.sink.send(&line)
}

/// `M2120`: auto leveling and probe control
pub(super) fn auto<H: Host, S: TelegramSink>(
    ctx: &mut Context<'_, H, S>,
    params: &Parameters<'_>,
) -> Result<(), S::Error> {
    match AutoLevelAction::parse(params) {
        Some(AutoLevelAction::SetSwitch(on)) => ctx.state.auto_level_shadow = on,
        Some(AutoLevelAction::Probe(pin)) => {
            debug!("probe pin {:?}", pin);
            ctx.host.enqueue(pin.gcode());
        }
        Some(AutoLevelAction::ProbeCenter) => {
            ctx.state.axis_telemetry_suppressed = true;
            ctx.host.home_if_needed();
            let [x, y] = ctx.config.leveling.center;
            match ctx.host.probe_at(x, y) {
                Some(z) => debug!("center probed at {}", z),
                None => warn!("center probe did not trigger"),
            }
            send_probe_offset(ctx)?;
        }
        Some(AutoLevelAction::RaiseOffset(step)) => {
            let offset = ctx.host.probe_offset_z() + step.millimeters();
            ctx.host.set_probe_offset_z(offset);
            send_probe_offset(ctx)?;
        }
        Some(AutoLevelAction::LowerOffset(step)) => {
            let offset = ctx.host.probe_offset_z() - step.millimeters();
            ctx.host.set_probe_offset_z(offset);
            send_probe_offset(ctx)?;
        }
        Some(AutoLevelAction::Save) => ctx.host.save(),
        Some(AutoLevelAction::Start) => {
            ctx.state.axis_telemetry_suppressed = true;
            ctx.host.enqueue("G28");
            ctx.host.enqueue("G29");
        }
        None => debug!("M2120 P{:?} not handled", params.get(Param::P)),
    }
    Ok(())
}

fn send_probe_offset<H: Host, S: TelegramSink>(ctx: &mut Context<'_, H, S>) -> Result<(), S::Error> {
    for line in telegram::probe_offset(ctx.host.probe_offset_z())? {
        ctx.sink.send(&line)?;
    }
    Ok(())
}
