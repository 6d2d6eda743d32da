//! Identifier decoding helpers.
//!
//! Scanners base64-encode encounter and fort ids. The aggregator wants the
//! decoded text, and for sightings also its numeric value.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::{Number, Value};

/// Standard alphabet, padding optional, trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode base64 into a string, one char per byte (latin1).
pub fn decode_latin1(encoded: &str) -> Option<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    match LENIENT.decode(compact.as_bytes()) {
        Ok(bytes) => Some(bytes.into_iter().map(char::from).collect()),
        Err(e) => {
            tracing::debug!(error = %e, encoded = %encoded, "Failed to decode id");
            None
        }
    }
}

/// Decode a JSON string field holding a base64 id.
pub fn decode_id(value: &Value) -> Option<String> {
    value.as_str().and_then(decode_latin1)
}

/// Parse the leading base-10 integer of `text`.
///
/// Leading whitespace and a sign are accepted and anything after the digits
/// is ignored. Encounter ids are unsigned 64-bit, so positive values use the
/// full `u64` range and negative ones the `i64` range. Returns `None` when
/// there are no digits or the value is out of range.
pub fn parse_int_prefix(text: &str) -> Option<Number> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let digits = &rest[..end];
    if negative {
        format!("-{}", digits).parse::<i64>().ok().map(Number::from)
    } else {
        digits.parse::<u64>().ok().map(Number::from)
    }
}
