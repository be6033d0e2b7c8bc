//! Luma and luminance weights.
//!
//! Two weightings are used in the crate:
//! - ITU-R BT.601 fixed-point luma, for every "convert to gray" operation
//!   (grayscale, sepia, the saturation blend). Integer arithmetic keeps the
//!   conversion exact and platform independent.
//! - ITU-R BT.709 luminance, for perceptual bucketing in the palette
//!   extractor.

/// BT.601 red weight in 16.16 fixed point (0.299).
pub const LUMA_R: u32 = 19595;

/// BT.601 green weight in 16.16 fixed point (0.587).
pub const LUMA_G: u32 = 38470;

/// BT.601 blue weight in 16.16 fixed point (0.114).
pub const LUMA_B: u32 = 7471;

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Gray level of an RGB pixel using BT.601 weights, rounded to nearest.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + 0x8000) >> 16) as u8
}

/// Perceptual luminance of an RGB pixel (0-255), truncated.
#[inline]
pub fn luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_weights_sum_to_one() {
        assert_eq!(LUMA_R + LUMA_G + LUMA_B, 1 << 16);
    }

    #[test]
    fn test_luminance_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma_u8(0, 0, 0), 0);
        assert_eq!(luma_u8(255, 255, 255), 255);
    }

    #[test]
    fn test_luma_gray_preserves_value() {
        for v in 0..=255u8 {
            assert_eq!(luma_u8(v, v, v), v, "gray {} should map to itself", v);
        }
    }

    #[test]
    fn test_luma_primaries() {
        // 0.299 * 255 = 76.2, 0.587 * 255 = 149.7, 0.114 * 255 = 29.1
        assert_eq!(luma_u8(255, 0, 0), 76);
        assert_eq!(luma_u8(0, 255, 0), 150);
        assert_eq!(luma_u8(0, 0, 255), 29);
    }

    #[test]
    fn test_luminance_primaries() {
        // 0.2126 * 255 = 54.2, 0.7152 * 255 = 182.4, 0.0722 * 255 = 18.4
        assert_eq!(luminance_u8(255, 0, 0), 54);
        assert_eq!(luminance_u8(0, 255, 0), 182);
        assert_eq!(luminance_u8(0, 0, 255), 18);
    }
}
