//! Command catalog and classifier
//!
//! The display sends three kinds of lines:
//! - plain G-code that the printer firmware can execute directly,
//! - vendor pseudo-commands (`L…` or very high `M…` numbers),
//! - noise the firmware must never see (e.g. `Geeetech…` banners).

use crate::params::{tokenize, Parameters};

/// Leader letter of the vendor's escaped `G` lines (`Ge…`)
pub const VENDOR_G_ESCAPE: u8 = b'e';

/// Classified command type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// Not understood; dropped
    Unknown,
    /// Standard G-code forwarded verbatim
    GCode,
    /// Manual leveling wizard closed on the display
    L101LevelingFinished,
    /// Z babystep with an absolute offset
    M290Babystep,
    /// Dual-Z endstop offset adjustment
    M2011DoubleZOffset,
    /// Load / unload / clean / stop extruder motors
    M2105ExtruderAction,
    /// Filament runout sensor on/off
    M2106FilamentRunout,
    /// Manual bed leveling wizard step
    M2107ManualLeveling,
    /// Auto leveling / probe wizard step
    M2120AutoLeveling,
    /// Firmware information request
    M2134FirmwareInfo,
    /// Set colour mix of the mixing hotend
    M2135ColorMix,
    /// Motion parameter query / update
    M2140MotionParams,
}

/// Vendor commands in match order.
///
/// No token may be a prefix of a token that comes after it, otherwise the
/// longer command could never be matched.
pub const CATALOG: [(CommandKind, &str); 10] = [
    (CommandKind::L101LevelingFinished, "L101"),
    (CommandKind::M290Babystep, "M290"),
    (CommandKind::M2011DoubleZOffset, "M2011"),
    (CommandKind::M2105ExtruderAction, "M2105"),
    (CommandKind::M2106FilamentRunout, "M2106"),
    (CommandKind::M2107ManualLeveling, "M2107"),
    (CommandKind::M2120AutoLeveling, "M2120"),
    (CommandKind::M2134FirmwareInfo, "M2134"),
    (CommandKind::M2135ColorMix, "M2135"),
    (CommandKind::M2140MotionParams, "M2140"),
];

impl CommandKind {
    /// Wire token for vendor kinds, `None` for Unknown and GCode
    pub fn token(self) -> Option<&'static str> {
        CATALOG
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, token)| *token)
    }

    /// Check if this is a vendor pseudo-command
    pub fn is_vendor(self) -> bool {
        !matches!(self, CommandKind::Unknown | CommandKind::GCode)
    }

    /// Commands whose effect the display expects to see in the very next
    /// status cycle
    pub fn needs_immediate_status(self) -> bool {
        matches!(
            self,
            CommandKind::L101LevelingFinished
                | CommandKind::M290Babystep
                | CommandKind::M2011DoubleZOffset
                | CommandKind::M2106FilamentRunout
                | CommandKind::M2107ManualLeveling
                | CommandKind::M2120AutoLeveling
                | CommandKind::M2135ColorMix
                | CommandKind::M2140MotionParams
        )
    }
}

/// Classify a decoded line
pub fn classify(text: &str) -> CommandKind {
    let bytes = text.as_bytes();
    let first = bytes.first().copied();

    if matches!(first, Some(b'M') | Some(b'L')) {
        if let Some((kind, _)) = CATALOG.iter().find(|(_, token)| text.starts_with(token)) {
            return *kind;
        }
    }

    match first {
        Some(b'M') => CommandKind::GCode,
        Some(b'G') if bytes.get(1) != Some(&VENDOR_G_ESCAPE) => CommandKind::GCode,
        _ => CommandKind::Unknown,
    }
}

/// Payload carried by a command, depending on its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Unknown lines carry nothing
    None,
    /// G-code text to forward
    GCode(&'a str),
    /// Parameters of a vendor command
    Parameters(Parameters<'a>),
}

/// One inbound command, borrowed from the decoded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    /// Classified type
    pub kind: CommandKind,
    /// Kind-specific payload
    pub payload: Payload<'a>,
}

impl<'a> Command<'a> {
    /// Classify and tokenize a decoded line
    pub fn parse(text: &'a str) -> Self {
        let kind = classify(text);
        let payload = match kind {
            CommandKind::Unknown => Payload::None,
            CommandKind::GCode => Payload::GCode(text),
            _ => Payload::Parameters(tokenize(text, kind)),
        };
        Self { kind, payload }
    }

    /// Vendor parameters, empty for G-code and unknown lines
    pub fn params(&self) -> Parameters<'a> {
        match &self.payload {
            Payload::Parameters(params) => params.clone(),
            _ => Parameters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Param;

    #[test]
    fn test_catalog_order_has_no_shadowed_tokens() {
        for (i, (_, earlier)) in CATALOG.iter().enumerate() {
            for (_, later) in &CATALOG[i + 1..] {
                assert!(
                    !later.starts_with(earlier),
                    "{} shadows {}",
                    earlier,
                    later
                );
            }
        }
    }

    #[test]
    fn test_vendor_m_command_wins_over_gcode() {
        assert_eq!(classify("M2120 P1 S0"), CommandKind::M2120AutoLeveling);
        assert_eq!(classify("M2105 S2"), CommandKind::M2105ExtruderAction);
        assert_eq!(classify("M290 Z0.05"), CommandKind::M290Babystep);
    }

    #[test]
    fn test_l_command() {
        assert_eq!(classify("L101"), CommandKind::L101LevelingFinished);
        assert_eq!(classify("L7 ?"), CommandKind::Unknown);
    }

    #[test]
    fn test_plain_gcode() {
        assert_eq!(classify("G28"), CommandKind::GCode);
        assert_eq!(classify("G1 X10 F3000"), CommandKind::GCode);
        assert_eq!(classify("M104 S200"), CommandKind::GCode);
    }

    #[test]
    fn test_vendor_escaped_g_is_unknown() {
        assert_eq!(classify("Geeetech"), CommandKind::Unknown);
        assert_eq!(classify("Geo"), CommandKind::Unknown);
    }

    #[test]
    fn test_other_leaders_are_unknown() {
        assert_eq!(classify(""), CommandKind::Unknown);
        assert_eq!(classify("T0"), CommandKind::Unknown);
        assert_eq!(classify("ok"), CommandKind::Unknown);
    }

    #[test]
    fn test_single_g_is_gcode() {
        // no second character, so it is not the vendor escape
        assert_eq!(classify("G"), CommandKind::GCode);
    }

    #[test]
    fn test_token_lookup() {
        assert_eq!(CommandKind::M2107ManualLeveling.token(), Some("M2107"));
        assert_eq!(CommandKind::GCode.token(), None);
        assert_eq!(CommandKind::Unknown.token(), None);
    }

    #[test]
    fn test_parse_payloads() {
        let gcode = Command::parse("G28 X");
        assert_eq!(gcode.payload, Payload::GCode("G28 X"));
        assert!(gcode.params().is_empty());

        let unknown = Command::parse("Geeetech");
        assert_eq!(unknown.payload, Payload::None);

        let vendor = Command::parse("M2120 P1 S0");
        assert_eq!(vendor.kind, CommandKind::M2120AutoLeveling);
        assert_eq!(vendor.params().get(Param::P), Some("1"));
    }

    #[test]
    fn test_immediate_status_subset() {
        assert!(CommandKind::M2107ManualLeveling.needs_immediate_status());
        assert!(!CommandKind::M2134FirmwareInfo.needs_immediate_status());
        assert!(!CommandKind::M2105ExtruderAction.needs_immediate_status());
        assert!(!CommandKind::GCode.needs_immediate_status());
    }
}
