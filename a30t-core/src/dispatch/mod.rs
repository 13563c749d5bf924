//! Command dispatcher
//!
//! Routes parsed commands to their handlers. G-code goes to the host queue
//! untouched, vendor commands are executed here, unknown lines are dropped.
//!
//! Handlers for wizard steps call [`BlockingMotion`](crate::traits::BlockingMotion)
//! and therefore stall the caller until the printer has finished moving.

mod extruder;
mod leveling;
mod offsets;
mod settings;

pub use extruder::parse_extruder_command;
pub use leveling::{
    AdjustStep, AutoLevelAction, HeightStep, LevelingPoint, ManualLevelingStep, ProbePin,
    COARSE_HEIGHT_STEP_MM,
};
pub use offsets::{DoubleZCommand, BABYSTEP_INCREMENT_MM, Z2_ADJUST_STEP_MM};

use a30t_protocol::{Command, CommandKind, Parameters, Payload};

use crate::config::AdapterConfig;
use crate::link::TelegramSink;
use crate::state::AdapterState;
use crate::status;
use crate::traits::Host;

/// Borrowed view handed to every handler
pub struct Context<'a, H, S> {
    pub state: &'a mut AdapterState,
    pub config: &'a AdapterConfig,
    pub host: &'a mut H,
    pub sink: &'a mut S,
}

/// Owner of the adapter state
#[derive(Debug, Clone)]
pub struct Dispatcher {
    state: AdapterState,
    config: AdapterConfig,
}

impl Dispatcher {
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            state: AdapterState::new(),
            config,
        }
    }

    pub fn state(&self) -> &AdapterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn context<'a, H, S>(&'a mut self, host: &'a mut H, sink: &'a mut S) -> Context<'a, H, S> {
        Context {
            state: &mut self.state,
            config: &self.config,
            host,
            sink,
        }
    }

    /// Execute one inbound command
    ///
    /// May block inside host motion calls for wizard steps.
    pub fn dispatch<H: Host, S: TelegramSink>(
        &mut self,
        command: &Command<'_>,
        now_ms: u32,
        host: &mut H,
        sink: &mut S,
    ) -> Result<(), S::Error> {
        self.state.track_command(command.kind);

        match &command.payload {
            Payload::None => debug!("ignored unknown line"),
            Payload::GCode(text) => {
                debug!("queue {}", *text);
                host.enqueue(text);
            }
            Payload::Parameters(params) => {
                debug!("vendor command {:?}", command.kind);
                let mut ctx = self.context(host, sink);
                handle_vendor(&mut ctx, command.kind, params)?;
            }
        }

        if command.kind.needs_immediate_status() {
            self.state.next_status_due = now_ms;
        }
        Ok(())
    }

    /// Run due extruder moves
    pub fn service_extruder<H: Host>(&mut self, now_ms: u32, host: &mut H) {
        extruder::service(&mut self.state, &self.config, now_ms, host);
    }

    /// Send the status telegrams when their cycle is due
    ///
    /// Returns whether a cycle was sent.
    pub fn send_status_if_due<H: Host, S: TelegramSink>(
        &mut self,
        now_ms: u32,
        host: &mut H,
        sink: &mut S,
    ) -> Result<bool, S::Error> {
        let mut ctx = self.context(host, sink);
        status::send_if_due(&mut ctx, now_ms)
    }
}

fn handle_vendor<H: Host, S: TelegramSink>(
    ctx: &mut Context<'_, H, S>,
    kind: CommandKind,
    params: &Parameters<'_>,
) -> Result<(), S::Error> {
    match kind {
        CommandKind::L101LevelingFinished => {
            ctx.state.auto_level_shadow = true;
            ctx.state.axis_telemetry_suppressed = false;
            Ok(())
        }
        CommandKind::M290Babystep => {
            offsets::babystep(ctx, params);
            Ok(())
        }
        CommandKind::M2011DoubleZOffset => {
            offsets::double_z(ctx, params);
            Ok(())
        }
        CommandKind::M2105ExtruderAction => {
            extruder::handle(ctx, params);
            Ok(())
        }
        CommandKind::M2106FilamentRunout => {
            settings::filament_runout(ctx, params);
            Ok(())
        }
        CommandKind::M2107ManualLeveling => leveling::manual(ctx, params),
        CommandKind::M2120AutoLeveling => leveling::auto(ctx, params),
        CommandKind::M2134FirmwareInfo => settings::firmware_info(ctx, params),
        CommandKind::M2135ColorMix => {
            settings::color_mix(ctx, params);
            Ok(())
        }
        CommandKind::M2140MotionParams => settings::motion_params(ctx, params),
        CommandKind::Unknown | CommandKind::GCode => Ok(()),
    }
}
