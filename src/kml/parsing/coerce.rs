//! Conversions from raw KML text to typed values
//!
//! KML colors are written `aabbggrr`, the reverse of the usual RGB order.

use crate::error::KmlError;
use crate::kml::model::Argb;

/// Parse a KML color. Accepts `aabbggrr`, or `bbggrr` with full opacity,
/// with an optional leading `#`.
pub fn parse_color(raw: &str) -> Result<Argb, KmlError> {
    let hex = raw.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(KmlError::InvalidColorFormat(raw.to_string()));
    }

    let (alpha, rest) = match hex.len() {
        8 => (u8::from_str_radix(&hex[0..2], 16), &hex[2..]),
        6 => (Ok(0xff), hex),
        _ => return Err(KmlError::InvalidColorFormat(raw.to_string())),
    };
    let channel = |i: usize| u8::from_str_radix(&rest[i..i + 2], 16);

    match (alpha, channel(0), channel(2), channel(4)) {
        (Ok(alpha), Ok(blue), Ok(green), Ok(red)) => Ok(Argb::from_components(alpha, red, green, blue)),
        _ => Err(KmlError::InvalidColorFormat(raw.to_string())),
    }
}

/// Parse a KML boolean: `0`/`1`, `true`/`false`, or any number by truthiness
pub fn parse_boolean_flag(raw: &str) -> Result<bool, KmlError> {
    let value = raw.trim();
    match value {
        "0" => return Ok(false),
        "1" => return Ok(true),
        _ => {}
    }
    if value.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    match value.parse::<f64>() {
        Ok(number) if !number.is_nan() => Ok(number != 0.0),
        _ => Err(KmlError::InvalidBooleanFormat(raw.to_string())),
    }
}

/// Parse a finite decimal (scale, heading, width, box edges)
pub fn parse_float(raw: &str) -> Result<f64, KmlError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(KmlError::InvalidNumber(raw.to_string())),
    }
}
