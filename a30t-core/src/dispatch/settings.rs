//! Printer settings commands: filament sensor, firmware info, colour mix and
//! motion parameters

use a30t_protocol::{MixRatio, Param, Parameters, SettingsGroup};

use super::Context;
use crate::link::TelegramSink;
use crate::status;
use crate::traits::{Host, MotionParameters};

/// `M2106`: filament runout sensor switch
pub(super) fn filament_runout<H: Host, S>(ctx: &mut Context<'_, H, S>, params: &Parameters<'_>) {
    let enabled = params.leading_digit(Param::S) == Some(1);
    debug!("filament runout {}", enabled);
    ctx.host.set_runout_enabled(enabled);
}

/// `M2134`: the display asks who we are
pub(super) fn firmware_info<H: Host, S: TelegramSink>(
    ctx: &mut Context<'_, H, S>,
    params: &Parameters<'_>,
) -> Result<(), S::Error> {
    if let Some(version) = params.get(Param::Fw) {
        info!("display firmware {}", version);
    }
    let line = status::firmware_info(ctx.config, &*ctx.host)?;
    ctx.sink.send(&line)
}

/// `M2135`: new colour mix, packed with an 8 bit stride
pub(super) fn color_mix<H: Host, S>(ctx: &mut Context<'_, H, S>, params: &Parameters<'_>) {
    let Some(value) = params.u32(Param::P) else {
        debug!("M2135 without value");
        return;
    };
    let mix = MixRatio::from_display_value(value);
    debug!("mix {:?}", mix);
    ctx.host.set_collector(mix.weights());
}

/// `M2140`: query or update one group of motion parameters
///
/// `A`..`D` values present in the command overwrite the matching fields of
/// the group before it is reported. Without `P` every group is reported.
pub(super) fn motion_params<H: Host, S: TelegramSink>(
    ctx: &mut Context<'_, H, S>,
    params: &Parameters<'_>,
) -> Result<(), S::Error> {
    let group = match params.leading_digit(Param::P) {
        None => None,
        Some(number) => match SettingsGroup::from_number(number) {
            Some(group) => Some(group),
            None => {
                debug!("M2140 P{} not handled", number);
                return Ok(());
            }
        },
    };

    if let Some(group) = group {
        let mut parameters = ctx.host.parameters();
        if update_group(&mut parameters, group, params) {
            ctx.host.set_parameters(&parameters);
        }
    }

    let snapshot = status::settings_snapshot(&*ctx.host, ctx.state);
    match group {
        Some(group) => ctx.sink.send(&snapshot.to_telegram(group)?),
        None => {
            for group in SettingsGroup::ALL {
                ctx.sink.send(&snapshot.to_telegram(group)?)?;
            }
            Ok(())
        }
    }
}

/// Write `A`..`D` into the fields of `group`, returning whether any changed
fn update_group(parameters: &mut MotionParameters, group: SettingsGroup, params: &Parameters<'_>) -> bool {
    const LETTERS: [Param; 4] = [Param::A, Param::B, Param::C, Param::D];

    let mut changed = false;
    for (i, letter) in LETTERS.iter().enumerate() {
        let Some(value) = params.f32(*letter) else {
            continue;
        };
        match group {
            SettingsGroup::StepsPerMm => parameters.steps_per_mm[i] = value,
            SettingsGroup::Feedrate => parameters.max_feedrate[i] = value,
            SettingsGroup::Jerk => parameters.jerk[i] = value,
            SettingsGroup::Acceleration => match i {
                0 => parameters.acceleration = value,
                1 => parameters.retract_feedrate = value,
                axis => parameters.max_acceleration[axis - 2] = value.max(0.0) as u32,
            },
            SettingsGroup::Babystep | SettingsGroup::DoubleZ => return false,
        }
        changed = true;
    }
    changed
}
