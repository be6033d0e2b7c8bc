//! 8-bit channel arithmetic and `#rrggbb` color codes.
//!
//! These helpers are shared by the pipeline stages (which blend and clamp
//! channel values) and the palette extractor (which renders swatches and
//! their darkened hover variants).

use thiserror::Error;

/// Errors produced when parsing color codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The input is not `#RRGGBB` (or `RRGGBB`) with six hex digits.
    #[error("Invalid color code: {0:?}")]
    InvalidColorCode(String),
}

/// Truncate `value` toward zero and bound it to `[min, max]`.
///
/// Values below `min` return `min`, values above `max` return `max`.
/// Fractions are dropped, never rounded: `12.9` becomes `12`.
#[inline]
pub fn clamp_range(value: f64, min: i32, max: i32) -> i32 {
    if value < min as f64 {
        return min;
    }
    if value > max as f64 {
        return max;
    }
    value as i32
}

/// Truncate `value` into a single 8-bit channel (`[0, 255]`).
///
/// NaN maps to 0.
#[inline]
pub fn clamp(value: f64) -> u8 {
    clamp_range(value, 0, 255) as u8
}

/// Encode three channel values as a lowercase `#rrggbb` string.
///
/// No clamping is done: a value above 255 simply formats wider than two
/// digits, so callers pre-clamp.
pub fn rgb_to_hex(r: u32, g: u32, b: u32) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Parse `#RRGGBB` (the leading `#` is optional) into three bytes.
pub fn parse_hex(code: &str) -> Result<[u8; 3], ColorError> {
    let digits = code.strip_prefix('#').unwrap_or(code);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidColorCode(code.to_string()));
    }

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| ColorError::InvalidColorCode(code.to_string()))?;
    }
    Ok(rgb)
}

/// Scale every channel of a hex color by `factor`.
///
/// `factor < 1` darkens, `1` is identity and `> 1` brightens; channels
/// saturate at 255 instead of wrapping. The result is lowercase `#rrggbb`.
///
/// A negative factor or a code that is not six hex digits returns the
/// input unchanged.
///
/// # Example
/// ```
/// use darkroom_core::color::colorscale;
///
/// assert_eq!(colorscale("#DF3C3C", 0.5), "#6f1e1e");
/// assert_eq!(colorscale("#52D24F", 1.6), "#83ff7e");
/// ```
pub fn colorscale(code: &str, factor: f64) -> String {
    if factor < 0.0 {
        return code.to_string();
    }
    let Ok([r, g, b]) = parse_hex(code) else {
        return code.to_string();
    };

    let scale = |c: u8| u32::from(clamp(c as f64 * factor));
    rgb_to_hex(scale(r), scale(g), scale(b))
}
