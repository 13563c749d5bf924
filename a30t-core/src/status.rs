//! Periodic status telegrams
//!
//! Every status period the display receives, in order: `L1` axis position
//! and the `L24` settings groups (both withheld while a wizard step moves the
//! printer), `L2` temperatures and `L3` print job information.

use a30t_protocol::telegram::{
    AxisInfo, FirmwareInfo, HeaterReading, PrintInfo, TemperatureInfo,
};
use a30t_protocol::{
    FilamentSensor, MixRatio, PrintStatus, SettingsGroup, SettingsSnapshot, Telegram,
    TelegramError,
};

use crate::config::AdapterConfig;
use crate::dispatch::Context;
use crate::link::TelegramSink;
use crate::state::AdapterState;
use crate::time::elapsed;
use crate::traits::{Heater, Host};

/// Round a non-negative reading to the nearest integer, saturating at 255
fn round_u8(value: f32) -> u8 {
    (value.max(0.0) + 0.5) as u8
}

/// Send one status cycle if it is due
///
/// Returns whether a cycle was sent.
pub fn send_if_due<H: Host, S: TelegramSink>(
    ctx: &mut Context<'_, H, S>,
    now_ms: u32,
) -> Result<bool, S::Error> {
    if !elapsed(now_ms, ctx.state.next_status_due) {
        return Ok(false);
    }
    ctx.state.next_status_due = now_ms.wrapping_add(ctx.config.timing.status_period_ms);

    if ctx.state.axis_telemetry_suppressed {
        trace!("axis telemetry suppressed");
    } else {
        ctx.sink.send(&axis_info(&*ctx.host).to_telegram()?)?;
        if ctx.config.telemetry.settings_in_status {
            let snapshot = settings_snapshot(&*ctx.host, ctx.state);
            for group in SettingsGroup::ALL {
                ctx.sink.send(&snapshot.to_telegram(group)?)?;
            }
        }
    }

    ctx.sink.send(&temperature_info(&*ctx.host).to_telegram()?)?;
    let line = print_info(&*ctx.host, ctx.state).to_telegram()?;
    ctx.sink.send(&line)?;
    Ok(true)
}

/// Current position and feedrate
pub fn axis_info<H: Host>(host: &H) -> AxisInfo {
    let [x, y, z] = host.position();
    AxisInfo {
        x,
        y,
        z,
        feedrate: round_u8(host.feedrate_mm_s()),
    }
}

/// Temperatures, fan and speed
pub fn temperature_info<H: Host>(host: &H) -> TemperatureInfo {
    let reading = |heater: Heater| HeaterReading {
        current: host.actual_celsius(heater),
        target: host.target_celsius(heater),
    };
    TemperatureInfo {
        bed: reading(Heater::Bed),
        hotend: reading(Heater::Hotend(0)),
        media_present: host.media_present(),
        fan_percent: round_u8(host.fan_percent(0)),
        speed_percent: round_u8(host.feedrate_percent()),
        feedrate: round_u8(host.feedrate_mm_s()),
    }
}

/// Print job state as the display shows it
pub fn print_info<'h, H: Host>(host: &'h H, state: &AdapterState) -> PrintInfo<'h> {
    PrintInfo {
        status: PrintStatus::resolve(&host.job_flags()),
        motors_enabled: host.steppers_enabled(),
        filament: FilamentSensor::from_host(host.runout_enabled(), host.filament_present()),
        auto_level: state.auto_level_shadow,
        mix: MixRatio::from_weights(host.collector()),
        file_name: host.file_name(),
        progress_percent: host.progress_percent(),
        elapsed_s: host.elapsed_seconds(),
    }
}

/// Values for the `L24` settings pages
pub fn settings_snapshot<H: Host>(host: &H, state: &AdapterState) -> SettingsSnapshot {
    let p = host.parameters();
    SettingsSnapshot {
        steps_per_mm: p.steps_per_mm,
        max_feedrate: p.max_feedrate,
        min_feedrate: p.min_feedrate,
        min_travel_feedrate: p.min_travel_feedrate,
        acceleration: p.acceleration,
        retract_feedrate: p.retract_feedrate,
        max_acceleration: p.max_acceleration,
        jerk: p.jerk,
        babystep: state.babystep_reference,
        z2_adjust: host.z2_endstop_adjust(),
    }
}

/// `L9` identity telegram
pub fn firmware_info<H: Host>(config: &AdapterConfig, host: &H) -> Result<Telegram, TelegramError> {
    let identity = &config.identity;
    FirmwareInfo {
        device_name: &identity.device_name,
        model: &identity.model,
        serial: &identity.serial,
        firmware_version: host.firmware_version(),
        build_volume: identity.build_volume,
        hardware: &identity.hardware,
    }
    .to_telegram()
}
