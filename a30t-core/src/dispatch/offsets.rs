//! Z fine tuning: `M290` babystep and `M2011` dual Z endstop offset
//!
//! The display sends absolute values, but the firmware only moves in fixed
//! increments toward them: one increment per command, direction taken from
//! the comparison with the previous value.

use a30t_protocol::{Param, Parameters};

use super::Context;
use crate::traits::Host;

/// Z babystep applied per `M290`
pub const BABYSTEP_INCREMENT_MM: f32 = 0.01;

/// Z2 endstop adjustment applied per `M2011` nudge
pub const Z2_ADJUST_STEP_MM: f32 = 0.01;

/// One `M2011` request
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoubleZCommand {
    /// `S0`: discard changes by reloading stored settings
    Reload,
    /// `P0`: value from the first Z motor page
    First(f32),
    /// Any other `P`: value from the second Z motor page
    Second(f32),
}

impl DoubleZCommand {
    pub fn parse(params: &Parameters<'_>) -> Self {
        if params.get(Param::S) == Some("0") {
            return Self::Reload;
        }
        let value = params.f32(Param::S).unwrap_or(0.0);
        match params.leading_digit(Param::P) {
            Some(0) => Self::First(value),
            _ => Self::Second(value),
        }
    }

    /// New Z2 adjustment given the current one
    ///
    /// A positive value on a page whose sign matches the current adjustment
    /// replaces it; otherwise the adjustment moves by one step.
    pub fn apply(self, current: f32) -> f32 {
        match self {
            Self::Reload => current,
            Self::First(value) if value > 0.0 => {
                if current >= 0.0 {
                    value
                } else {
                    current + Z2_ADJUST_STEP_MM
                }
            }
            Self::First(_) => current - Z2_ADJUST_STEP_MM,
            Self::Second(value) if value > 0.0 => {
                if current <= 0.0 {
                    0.0 - value
                } else {
                    current - Z2_ADJUST_STEP_MM
                }
            }
            Self::Second(_) => current + Z2_ADJUST_STEP_MM,
        }
    }
}

/// `M290`: babystep toward the displayed value
pub(super) fn babystep<H: Host, S>(ctx: &mut Context<'_, H, S>, params: &Parameters<'_>) {
    if params.get(Param::Z) == Some("0") {
        ctx.state.babystep_reference = 0.0;
        return;
    }

    let z = params.f32(Param::Z).unwrap_or(0.0);
    let step = if z > ctx.state.babystep_reference {
        BABYSTEP_INCREMENT_MM
    } else {
        -BABYSTEP_INCREMENT_MM
    };
    ctx.host.babystep_z(step);
    ctx.state.babystep_reference = z;
}

/// `M2011`: dual Z endstop adjustment
pub(super) fn double_z<H: Host, S>(ctx: &mut Context<'_, H, S>, params: &Parameters<'_>) {
    let command = DoubleZCommand::parse(params);
    debug!("double Z {:?}", command);

    if command == DoubleZCommand::Reload {
        ctx.host.load();
        return;
    }
    let adjust = command.apply(ctx.host.z2_endstop_adjust());
    ctx.host.set_z2_endstop_adjust(adjust);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterConfig;
    use crate::dispatch::Dispatcher;
    use crate::testing::{MockHost, RecordingSink};
    use a30t_protocol::Command;

    fn parse(line: &str) -> DoubleZCommand {
        DoubleZCommand::parse(&Command::parse(line).params())
    }

    fn approx(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-5 && d > -1e-5
    }

    #[test]
    fn test_parse_double_z() {
        assert_eq!(parse("M2011 S0"), DoubleZCommand::Reload);
        assert_eq!(parse("M2011 P0 S0.20"), DoubleZCommand::First(0.2));
        assert_eq!(parse("M2011 P1 S0.20"), DoubleZCommand::Second(0.2));
        // only the exact text "0" reloads
        assert_eq!(parse("M2011 P0 S0.00"), DoubleZCommand::First(0.0));
        assert_eq!(parse("M2011 P0"), DoubleZCommand::First(0.0));
    }

    #[test]
    fn test_first_page_sign_convention() {
        assert!(approx(DoubleZCommand::First(0.3).apply(0.1), 0.3));
        assert!(approx(DoubleZCommand::First(0.3).apply(-0.1), -0.09));
        assert!(approx(DoubleZCommand::First(0.0).apply(0.1), 0.09));
    }

    #[test]
    fn test_second_page_sign_convention() {
        assert!(approx(DoubleZCommand::Second(0.3).apply(-0.1), -0.3));
        assert!(approx(DoubleZCommand::Second(0.3).apply(0.0), -0.3));
        assert!(approx(DoubleZCommand::Second(0.3).apply(0.1), 0.09));
        assert!(approx(DoubleZCommand::Second(0.0).apply(-0.1), -0.09));
    }

    fn dispatch(dispatcher: &mut Dispatcher, host: &mut MockHost, line: &str) {
        let mut sink = RecordingSink::default();
        dispatcher
            .dispatch(&Command::parse(line), 0, host, &mut sink)
            .unwrap();
    }

    #[test]
    fn test_reload_does_not_touch_adjustment() {
        let mut dispatcher = Dispatcher::new(AdapterConfig::default());
        let mut host = MockHost {
            z2_adjust: 0.4,
            ..Default::default()
        };
        dispatch(&mut dispatcher, &mut host, "M2011 S0");
        assert_eq!(host.loads, 1);
        assert_eq!(host.z2_adjust, 0.4);
    }

    #[test]
    fn test_babystep_follows_reference() {
        let mut dispatcher = Dispatcher::new(AdapterConfig::default());
        let mut host = MockHost::default();

        dispatch(&mut dispatcher, &mut host, "M290 Z0.05");
        dispatch(&mut dispatcher, &mut host, "M290 Z0.10");
        dispatch(&mut dispatcher, &mut host, "M290 Z0.05");
        assert_eq!(host.babysteps, [0.01, 0.01, -0.01]);
        assert_eq!(dispatcher.state().babystep_reference, 0.05);
    }

    #[test]
    fn test_babystep_zero_resets_reference_without_moving() {
        let mut dispatcher = Dispatcher::new(AdapterConfig::default());
        let mut host = MockHost::default();

        dispatch(&mut dispatcher, &mut host, "M290 Z0.20");
        dispatch(&mut dispatcher, &mut host, "M290 Z0");
        assert_eq!(host.babysteps, [0.01]);
        assert_eq!(dispatcher.state().babystep_reference, 0.0);
    }
}
