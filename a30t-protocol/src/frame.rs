//! Line framing for the A30T display protocol.
//!
//! Every line on the wire is ASCII text terminated by a newline. Lines may be
//! wrapped in a checksum envelope:
//!
//! ```text
//! ┌────────┬──────────────┬───┬──────────┬──────┐
//! │ "N-0 " │ TEXT         │ * │ CHECKSUM │ CRLF │
//! │ 4B     │ 0–160B       │   │ decimal  │      │
//! └────────┴──────────────┴───┴──────────┴──────┘
//! ```
//!
//! CHECKSUM is the XOR of every byte before the `*`, line marker included.
//! Inbound checksums are stripped but never verified.

use heapless::Vec;

/// Line-number marker the display puts in front of framed lines
pub const LINE_MARKER: &str = "N-0 ";

/// Separator between line text and checksum
pub const CHECKSUM_DELIMITER: u8 = b'*';

/// Inbound checksums are accepted as-is.
///
/// The display has never been observed to send a correct checksum for
/// every command, so decoding does not check it.
pub const INBOUND_CHECKSUM_VERIFIED: bool = false;

/// Maximum text length of a single outbound line (without framing)
pub const MAX_LINE_TEXT: usize = 160;

/// Maximum encoded line size (marker + text + `*255` + CRLF)
pub const MAX_ENCODED_LINE: usize = LINE_MARKER.len() + MAX_LINE_TEXT + 4 + 2;

/// Maximum inbound line size accepted from the display
pub const MAX_INBOUND_LINE: usize = 96;

/// Errors that can occur while framing or unframing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Line text exceeds the outbound limit
    LineTooLong,
    /// Inbound line is not valid UTF-8
    InvalidUtf8,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// An inbound line with its framing removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedLine<'a> {
    /// Command text without marker or checksum
    pub text: &'a str,
    /// Checksum digits as sent by the display (unverified)
    pub checksum: Option<&'a str>,
}

/// XOR checksum over a byte slice, continuing from `seed`
pub fn checksum(seed: u8, bytes: &[u8]) -> u8 {
    bytes.iter().fold(seed, |acc, &b| acc ^ b)
}

/// Checksum contribution of the line marker
///
/// Equal to 115, the seed the display firmware uses when it skips the marker.
pub fn marker_seed() -> u8 {
    checksum(0, LINE_MARKER.as_bytes())
}

/// Remove framing from a raw inbound line
///
/// Trailing CR/LF are trimmed, then everything from the last `*` on is
/// dropped (unless the `*` is the very first character), and finally every
/// leading `"N-0 "` marker is removed. Some display commands carry the marker
/// twice, so this strips repeatedly.
pub fn decode_line(raw: &[u8]) -> Result<DecodedLine<'_>, FrameError> {
    let line = core::str::from_utf8(raw).map_err(|_| FrameError::InvalidUtf8)?;
    let line = line.trim_end_matches(['\r', '\n']);

    let (mut text, checksum) = match line.rfind(CHECKSUM_DELIMITER as char) {
        Some(idx) if idx > 0 => (&line[..idx], Some(&line[idx + 1..])),
        _ => (line, None),
    };

    while let Some(rest) = text.strip_prefix(LINE_MARKER) {
        text = rest;
    }

    Ok(DecodedLine { text, checksum })
}

/// Encode a line for the display
///
/// With `with_checksum` the line becomes `N-0 <text>*<xor>`; without it the
/// text is sent bare. Both variants end in CRLF.
pub fn encode_line(
    text: &str,
    with_checksum: bool,
) -> Result<Vec<u8, MAX_ENCODED_LINE>, FrameError> {
    if text.len() > MAX_LINE_TEXT {
        return Err(FrameError::LineTooLong);
    }

    let mut out = Vec::new();
    if with_checksum {
        out.extend_from_slice(LINE_MARKER.as_bytes())
            .map_err(|_| FrameError::BufferTooSmall)?;
        out.extend_from_slice(text.as_bytes())
            .map_err(|_| FrameError::BufferTooSmall)?;

        let sum = checksum(0, &out);
        out.push(CHECKSUM_DELIMITER)
            .map_err(|_| FrameError::BufferTooSmall)?;
        push_decimal(&mut out, sum)?;
    } else {
        out.extend_from_slice(text.as_bytes())
            .map_err(|_| FrameError::BufferTooSmall)?;
    }

    out.extend_from_slice(b"\r\n")
        .map_err(|_| FrameError::BufferTooSmall)?;
    Ok(out)
}

fn push_decimal<const N: usize>(out: &mut Vec<u8, N>, value: u8) -> Result<(), FrameError> {
    let digits = [value / 100, (value / 10) % 10, value % 10];
    let skip = if value >= 100 {
        0
    } else if value >= 10 {
        1
    } else {
        2
    };
    for &d in &digits[skip..] {
        out.push(b'0' + d).map_err(|_| FrameError::BufferTooSmall)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_marker_seed_is_115() {
        assert_eq!(marker_seed(), 115);
    }

    #[test]
    fn test_decode_strips_repeated_marker() {
        let line = decode_line(b"N-0 N-0 G28").unwrap();
        assert_eq!(line.text, "G28");
        assert_eq!(line.checksum, None);
    }

    #[test]
    fn test_decode_strips_checksum_at_last_star() {
        let line = decode_line(b"N-0 M2105 S2*37\n").unwrap();
        assert_eq!(line.text, "M2105 S2");
        assert_eq!(line.checksum, Some("37"));
    }

    #[test]
    fn test_decode_uses_last_star() {
        let line = decode_line(b"N-0 L14 a*b*99\r\n").unwrap();
        assert_eq!(line.text, "L14 a*b");
    }

    #[test]
    fn test_decode_keeps_leading_star() {
        let line = decode_line(b"*12").unwrap();
        assert_eq!(line.text, "*12");
        assert_eq!(line.checksum, None);
    }

    #[test]
    fn test_decode_accepts_wrong_checksum() {
        assert!(!INBOUND_CHECKSUM_VERIFIED);
        let line = decode_line(b"N-0 G28*0").unwrap();
        assert_eq!(line.text, "G28");
    }

    #[test]
    fn test_decode_marker_without_space_is_kept() {
        let line = decode_line(b"N-0G28").unwrap();
        assert_eq!(line.text, "N-0G28");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert_eq!(decode_line(&[0xFF, 0xFE]), Err(FrameError::InvalidUtf8));
    }

    #[test]
    fn test_encode_with_checksum() {
        // 115 ^ 'G' ^ '2' ^ '8' = 62
        let encoded = encode_line("G28", true).unwrap();
        assert_eq!(&encoded[..], b"N-0 G28*62\r\n");
    }

    #[test]
    fn test_encode_without_checksum() {
        let encoded = encode_line("M2107 ok", false).unwrap();
        assert_eq!(&encoded[..], b"M2107 ok\r\n");
    }

    #[test]
    fn test_encode_empty_text() {
        let encoded = encode_line("", true).unwrap();
        assert_eq!(&encoded[..], b"N-0 *115\r\n");
    }

    #[test]
    fn test_encode_single_digit_checksum() {
        // 115 ^ 's' = 115 ^ 115 = 0
        let encoded = encode_line("s", true).unwrap();
        assert_eq!(&encoded[..], b"N-0 s*0\r\n");
    }

    #[test]
    fn test_encode_line_too_long() {
        let text = [b'A'; MAX_LINE_TEXT + 1];
        let text = core::str::from_utf8(&text).unwrap();
        assert_eq!(encode_line(text, true), Err(FrameError::LineTooLong));
    }

    #[test]
    fn test_encode_max_line_fits() {
        let text = [b'A'; MAX_LINE_TEXT];
        let text = core::str::from_utf8(&text).unwrap();
        assert!(encode_line(text, true).is_ok());
    }

    proptest! {
        #[test]
        fn prop_decode_recovers_encoded_text(text in "[A-MO-Z][A-Za-z0-9 .:;/-]{0,60}") {
            let encoded = encode_line(&text, true).unwrap();
            let decoded = decode_line(&encoded).unwrap();
            prop_assert_eq!(decoded.text, text.as_str());
        }

        #[test]
        fn prop_checksum_is_deterministic(text in "[ -)+-~]{0,80}") {
            let a = encode_line(&text, true).unwrap();
            let b = encode_line(&text, true).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
