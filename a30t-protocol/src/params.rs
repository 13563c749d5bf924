//! Parameter tokenizer for vendor commands
//!
//! Vendor commands carry space separated `<letter><value>` tokens, for
//! example `M2120 P1 S0` or `M2134 FW:1.04`. Values are kept as borrowed
//! text; handlers decide how to interpret them.

use crate::command::CommandKind;

/// Number of known parameter identifiers
pub const PARAM_COUNT: usize = 9;

/// Known parameter identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Param {
    P,
    S,
    A,
    B,
    C,
    D,
    R,
    Z,
    /// Display firmware version, sent as `FW:<version>`
    Fw,
}

impl Param {
    /// All identifiers, in the order they are tried at the scan cursor
    pub const ALL: [Param; PARAM_COUNT] = [
        Param::P,
        Param::S,
        Param::A,
        Param::B,
        Param::C,
        Param::D,
        Param::R,
        Param::Z,
        Param::Fw,
    ];

    /// Wire spelling of the identifier
    pub fn tag(self) -> &'static str {
        match self {
            Param::P => "P",
            Param::S => "S",
            Param::A => "A",
            Param::B => "B",
            Param::C => "C",
            Param::D => "D",
            Param::R => "R",
            Param::Z => "Z",
            Param::Fw => "FW",
        }
    }

    /// Offset from the start of the token to the start of the value
    pub fn value_offset(self) -> usize {
        match self {
            // "FW:" - the colon is not part of the value
            Param::Fw => 3,
            _ => 1,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Parameter values of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters<'a> {
    values: [Option<&'a str>; PARAM_COUNT],
}

impl<'a> Parameters<'a> {
    /// Raw value of a parameter
    pub fn get(&self, param: Param) -> Option<&'a str> {
        self.values[param.index()]
    }

    /// Check if a parameter was sent with a value
    pub fn has(&self, param: Param) -> bool {
        self.get(param).is_some()
    }

    /// Check if no parameter was sent
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// First character of a value as a decimal digit
    ///
    /// Sub-commands are keyed on this, so `S10` yields 1.
    pub fn leading_digit(&self, param: Param) -> Option<u8> {
        self.get(param)
            .and_then(|v| v.as_bytes().first().copied())
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
    }

    /// Value parsed as a float
    pub fn f32(&self, param: Param) -> Option<f32> {
        self.get(param).and_then(|v| v.parse().ok())
    }

    /// Value parsed as an unsigned integer
    pub fn u32(&self, param: Param) -> Option<u32> {
        self.get(param).and_then(|v| v.parse().ok())
    }

    fn set(&mut self, param: Param, value: &'a str) {
        let slot = &mut self.values[param.index()];
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

/// Extract parameters from a vendor command line
///
/// Returns an empty set for Unknown/GCode kinds and when the line has
/// nothing after the command token and its separating space.
pub fn tokenize(text: &str, kind: CommandKind) -> Parameters<'_> {
    let mut params = Parameters::default();
    let Some(token) = kind.token() else {
        return params;
    };
    if text.len() <= token.len() + 1 {
        return params;
    }
    let Some(mut rest) = text.get(token.len() + 1..) else {
        return params;
    };

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        let Some(param) = Param::ALL
            .iter()
            .copied()
            .find(|p| rest.starts_with(p.tag()))
        else {
            break;
        };

        let end = rest.find(' ').unwrap_or(rest.len());
        let value = rest.get(param.value_offset()..end).unwrap_or("");
        if !value.is_empty() {
            params.set(param, value);
        }
        rest = &rest[end..];
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Parameters<'_> {
        tokenize(text, crate::command::classify(text))
    }

    #[test]
    fn test_two_parameters() {
        let params = parse("M2120 P1 S0");
        assert_eq!(params.get(Param::P), Some("1"));
        assert_eq!(params.get(Param::S), Some("0"));
        assert_eq!(params.get(Param::A), None);
    }

    #[test]
    fn test_no_parameters() {
        assert!(parse("M2120").is_empty());
        assert!(parse("M2120 ").is_empty());
    }

    #[test]
    fn test_order_is_irrelevant() {
        let params = parse("M2120 S0 P1");
        assert_eq!(params.get(Param::P), Some("1"));
        assert_eq!(params.get(Param::S), Some("0"));
    }

    #[test]
    fn test_extra_spaces() {
        let params = parse("M2140 P0   A80.00  B80.00");
        assert_eq!(params.get(Param::P), Some("0"));
        assert_eq!(params.get(Param::A), Some("80.00"));
        assert_eq!(params.get(Param::B), Some("80.00"));
    }

    #[test]
    fn test_firmware_tag_skips_colon() {
        let params = parse("M2134 FW:V1.04.20");
        assert_eq!(params.get(Param::Fw), Some("V1.04.20"));
    }

    #[test]
    fn test_stops_at_unknown_letter() {
        let params = parse("M2107 S1 X5 P2");
        assert_eq!(params.get(Param::S), Some("1"));
        assert_eq!(params.get(Param::P), None);
    }

    #[test]
    fn test_letter_without_value_is_absent() {
        let params = parse("M2120 P S1");
        assert_eq!(params.get(Param::P), None);
        assert_eq!(params.get(Param::S), Some("1"));
    }

    #[test]
    fn test_repeated_letter_keeps_first() {
        let params = parse("M2106 S1 S0");
        assert_eq!(params.get(Param::S), Some("1"));
    }

    #[test]
    fn test_gcode_has_no_parameters() {
        assert!(tokenize("G1 X10", CommandKind::GCode).is_empty());
    }

    #[test]
    fn test_leading_digit() {
        let params = parse("M2107 S10 P");
        assert_eq!(params.leading_digit(Param::S), Some(1));
        assert_eq!(params.leading_digit(Param::P), None);

        let params = parse("M2107 S-1");
        assert_eq!(params.leading_digit(Param::S), None);
    }

    #[test]
    fn test_numeric_values() {
        let params = parse("M290 Z-0.05 P8421504");
        assert_eq!(params.f32(Param::Z), Some(-0.05));
        assert_eq!(params.u32(Param::P), Some(8421504));
        assert_eq!(params.u32(Param::Z), None);
    }
}
