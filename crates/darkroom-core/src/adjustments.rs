//! Color stages of the editing pipeline.
//!
//! ## Stage Order
//! 1. Brightness
//! 2. Vibrance (saturation blend)
//! 3. Grayscale
//! 4. Invert
//! 5. Sepia
//!
//! Balance reuses the vibrance blend and Hue runs late in the pipeline,
//! after the filters. Every function returns a new image and leaves its
//! input untouched; alpha is carried through unchanged unless a stage
//! produces a format without alpha.

use palette::{FromColor, Hsv, ShiftHue, Srgb};

use crate::color::clamp;
use crate::decode::{DecodedImage, PixelFormat};
use crate::lut::{apply_lut, ChannelLut};
use crate::luminance::luma_u8;
use crate::manipulator::StageError;

/// Scale every color channel by `factor` (0 = black, 1 = unchanged).
///
/// Equivalent to blending with a black image: `out = clamp(factor * v)`,
/// truncated toward zero.
pub fn apply_brightness(image: &DecodedImage, factor: f64) -> DecodedImage {
    let mut output = image.clone();
    apply_lut(&mut output, &ChannelLut::scale(factor));
    output
}

/// Blend each pixel with its own gray level.
///
/// Factor 0 gives the gray image, 1 the original, and larger factors
/// extrapolate for an oversaturated look:
/// `out = clamp(gray + factor * (v - gray))`.
///
/// Gray images have nothing to saturate and are returned as-is.
pub fn apply_saturation_blend(image: &DecodedImage, factor: f64) -> DecodedImage {
    let mut output = image.to_truecolor();
    if output.format.color_channels() == 1 || factor == 1.0 {
        return output;
    }

    let channels = output.channels();
    for pixel in output.pixels.chunks_exact_mut(channels) {
        let gray = luma_u8(pixel[0], pixel[1], pixel[2]) as f64;
        for c in &mut pixel[..3] {
            *c = clamp(gray + factor * (*c as f64 - gray));
        }
    }
    output
}

/// Convert to a single luma channel.
///
/// The output is always [`PixelFormat::Luma`]; alpha is dropped.
pub fn apply_grayscale(image: &DecodedImage) -> DecodedImage {
    let truecolor = image.to_truecolor();
    let channels = truecolor.channels();
    let pixels = match truecolor.format {
        PixelFormat::Luma => return truecolor,
        PixelFormat::LumaAlpha => truecolor.pixels.chunks_exact(2).map(|p| p[0]).collect(),
        _ => truecolor
            .pixels
            .chunks_exact(channels)
            .map(|p| luma_u8(p[0], p[1], p[2]))
            .collect(),
    };
    DecodedImage::with_format(image.width, image.height, PixelFormat::Luma, pixels)
}

/// Replace every channel value `v` with `255 - v`.
///
/// # Errors
///
/// Only single-channel gray and RGB images can be inverted. Any other
/// format returns `StageError::UnsupportedOperation` and no image.
pub fn apply_invert(image: &DecodedImage) -> Result<DecodedImage, StageError> {
    match image.format {
        PixelFormat::Luma | PixelFormat::Rgb => {
            let mut output = image.clone();
            apply_lut(&mut output, &ChannelLut::invert());
            Ok(output)
        }
        format => Err(StageError::UnsupportedOperation {
            stage: "invert",
            format,
        }),
    }
}

/// The 256-entry sepia tone palette running from black to `base`.
///
/// Entry `i` is `base * i / 255` per channel (integer division), so the
/// last entry is the base color itself.
pub fn sepia_palette(base: [u8; 3]) -> [[u8; 3]; 256] {
    let mut palette = [[0u8; 3]; 256];
    for (i, entry) in palette.iter_mut().enumerate() {
        for (c, value) in entry.iter_mut().enumerate() {
            *value = (base[c] as usize * i / 255) as u8;
        }
    }
    palette
}

/// Warm monochrome: gray levels mapped through [`sepia_palette`].
///
/// The output is RGB; alpha is dropped.
pub fn apply_sepia(image: &DecodedImage, base: [u8; 3]) -> DecodedImage {
    let gray = apply_grayscale(image);
    let palette = sepia_palette(base);

    let mut pixels = Vec::with_capacity(gray.pixels.len() * 3);
    for &level in &gray.pixels {
        pixels.extend_from_slice(&palette[level as usize]);
    }
    DecodedImage::with_format(image.width, image.height, PixelFormat::Rgb, pixels)
}

/// Rotate the hue of every pixel by `degrees` in HSV space.
///
/// Saturation and value are kept. Gray formats have no hue and are
/// returned unchanged; indexed images have their color table rotated.
pub fn apply_hue(image: &DecodedImage, degrees: i32) -> DecodedImage {
    let mut output = image.clone();
    let shift = degrees.rem_euclid(360) as f32;
    if shift == 0.0 {
        return output;
    }

    match output.format {
        PixelFormat::Luma | PixelFormat::LumaAlpha => {}
        PixelFormat::Indexed => {
            if let Some(table) = output.color_table.as_mut() {
                for entry in table.iter_mut() {
                    *entry = rotate_hue(*entry, shift);
                }
            }
        }
        PixelFormat::Rgb | PixelFormat::Rgba => {
            let channels = output.channels();
            for pixel in output.pixels.chunks_exact_mut(channels) {
                let [r, g, b] = rotate_hue([pixel[0], pixel[1], pixel[2]], shift);
                pixel[0] = r;
                pixel[1] = g;
                pixel[2] = b;
            }
        }
    }
    output
}

/// Rotate one color's hue by `shift` degrees (0-360).
#[inline]
fn rotate_hue(rgb: [u8; 3], shift: f32) -> [u8; 3] {
    let color: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    let hsv: Hsv = Hsv::from_color(color);
    if hsv.saturation == 0.0 {
        return rgb;
    }
    let rotated: Srgb<u8> = Srgb::<f32>::from_color(hsv.shift_hue(shift)).into_format();
    [rotated.red, rotated.green, rotated.blue]
}


// ============================================================================
// Property-Based Tests
// ============================================================================
