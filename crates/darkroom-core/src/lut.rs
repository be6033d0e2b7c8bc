//! Per-channel lookup tables.
//!
//! Point operations on 8-bit channels (brightness, invert) only ever see 256
//! distinct inputs, so they are evaluated once into a table and applied with
//! a single index per sample.

use crate::color::clamp;
use crate::decode::{DecodedImage, PixelFormat};

// ============================================================================
// LUT Type
// ============================================================================

/// Pre-computed 256-entry lookup table for one channel value mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLut {
    /// LUT values: lut[input] = output
    pub lut: [u8; 256],
}

impl ChannelLut {
    /// Build a table by evaluating `f` for every input value.
    pub fn from_fn(f: impl Fn(u8) -> u8) -> Self {
        let mut lut = [0u8; 256];
        for (i, lut_value) in lut.iter_mut().enumerate() {
            *lut_value = f(i as u8);
        }
        Self { lut }
    }

    /// Create identity LUT (no change).
    pub fn identity() -> Self {
        Self::from_fn(|v| v)
    }

    /// Multiply by `factor`, truncating and clamping to [0, 255].
    ///
    /// Factor 0 maps everything to black, factor 1 is the identity.
    pub fn scale(factor: f64) -> Self {
        Self::from_fn(|v| clamp(v as f64 * factor))
    }

    /// Photographic negative, `255 - v`.
    pub fn invert() -> Self {
        Self::from_fn(|v| 255 - v)
    }

    /// Check if this LUT is identity.
    pub fn is_identity(&self) -> bool {
        self.lut.iter().enumerate().all(|(i, &v)| v == i as u8)
    }

    /// Look up one value.
    #[inline]
    pub fn get(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }
}

impl Default for ChannelLut {
    fn default() -> Self {
        Self::identity()
    }
}

// ============================================================================
// LUT Application
// ============================================================================

/// Apply a LUT to the color channels of an image in place.
///
/// Alpha is left untouched. For indexed images the color table is remapped
/// instead of the pixels.
pub fn apply_lut(image: &mut DecodedImage, lut: &ChannelLut) {
    // Early exit for identity
    if lut.is_identity() {
        return;
    }

    if image.format == PixelFormat::Indexed {
        if let Some(table) = image.color_table.as_mut() {
            for entry in table.iter_mut() {
                for c in entry.iter_mut() {
                    *c = lut.get(*c);
                }
            }
        }
        return;
    }

    let channels = image.format.channels();
    let color_channels = image.format.color_channels();
    for pixel in image.pixels.chunks_exact_mut(channels) {
        for c in &mut pixel[..color_channels] {
            *c = lut.get(*c);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
