//! `M2105` extruder actions

use a30t_protocol::mix::MIX_CHANNELS;
use a30t_protocol::{Param, Parameters};

use super::Context;
use crate::config::AdapterConfig;
use crate::state::{AdapterState, ExtruderEvent};
use crate::traits::Host;

use crate::state::extruder::EXTRUDE_FEEDRATE_MM_S;

/// Map the `S` digit of `M2105` to an extruder event
///
/// `S2` load, `S3` unload, `S5` clean; `S4` and everything else stop.
pub fn parse_extruder_command(params: &Parameters<'_>) -> ExtruderEvent {
    match params.leading_digit(Param::S) {
        Some(2) => ExtruderEvent::Load,
        Some(3) => ExtruderEvent::Unload,
        Some(5) => ExtruderEvent::Clean,
        Some(4) => ExtruderEvent::Stop,
        other => {
            debug!("M2105 S{:?} stops extruder", other);
            ExtruderEvent::Stop
        }
    }
}

pub(super) fn handle<H, S>(ctx: &mut Context<'_, H, S>, params: &Parameters<'_>) {
    let event = parse_extruder_command(params);
    debug!("extruder {:?}", event);
    ctx.state.extruder.handle(event);
}

pub(super) fn service<H: Host>(
    state: &mut AdapterState,
    config: &AdapterConfig,
    now_ms: u32,
    host: &mut H,
) {
    let timing = &config.timing;
    let tick = state.extruder.tick(
        now_ms,
        timing.extrude_period_ms,
        timing.extruder_switch_period_ms,
    );

    if let Some(channel) = tick.select_channel {
        let mut weights = [0.0; MIX_CHANNELS];
        weights[channel as usize % MIX_CHANNELS] = 1.0;
        host.set_collector(weights);
    }
    if let Some(distance) = tick.extrude_mm {
        host.extrude_relative(distance, EXTRUDE_FEEDRATE_MM_S);
    }
}
