//! Dominant color extraction for the palette panel.
//!
//! Pixels are grouped into bins keyed by coarse luminance, hue and
//! saturation. Each bin's colors are averaged, so one swatch stands for a
//! family of similar pixels rather than a single exact value.

use std::collections::HashMap;
use std::path::Path;

use ::palette::{FromColor, Hsl, Srgb};

use crate::color::{colorscale, rgb_to_hex};
use crate::config::PipelineConfig;
use crate::decode::{open_image, DecodeError, DecodedImage};
use crate::luminance::luminance_u8;

/// One extracted color.
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    /// `#rrggbb` of the bin's average color.
    pub hex: String,
    /// Darkened variant for hover highlighting.
    pub hover: String,
    /// Fraction of all pixels that fell in this bin.
    pub proportion: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Bin {
    sum: [u64; 3],
    count: u64,
}

impl Bin {
    fn average(&self) -> [u8; 3] {
        let n = self.count.max(1);
        [
            (self.sum[0] / n) as u8,
            (self.sum[1] / n) as u8,
            (self.sum[2] / n) as u8,
        ]
    }
}

/// Bin of one color: luminance in 16 steps, hue in 16 sectors and
/// saturation in 8 steps.
fn bin_key(r: u8, g: u8, b: u8) -> u32 {
    let y = luminance_u8(r, g, b) as u32;
    let color: Srgb<f32> = Srgb::new(r, g, b).into_format();
    let hsl: Hsl = Hsl::from_color(color);
    let hue = ((hsl.hue.into_positive_degrees() / 22.5) as u32).min(15);
    let saturation = ((hsl.saturation * 8.0) as u32).min(7);
    ((y >> 4) << 8) | (hue << 3) | saturation
}

/// Extract up to `config.palette_limit` swatches.
///
/// The most frequent bins are kept and returned in ascending order of
/// proportion. Alpha is ignored. An empty image yields no swatches.
pub fn extract_palette(image: &DecodedImage, config: &PipelineConfig) -> Vec<Swatch> {
    let rgb = image.to_rgb();
    let total = rgb.pixel_count() as u64;
    if total == 0 {
        return Vec::new();
    }

    let mut bins: HashMap<u32, Bin> = HashMap::new();
    for pixel in rgb.pixels.chunks_exact(3) {
        let bin = bins.entry(bin_key(pixel[0], pixel[1], pixel[2])).or_default();
        for c in 0..3 {
            bin.sum[c] += pixel[c] as u64;
        }
        bin.count += 1;
    }

    let mut ranked: Vec<(u32, Bin)> = bins.into_iter().collect();
    // Most frequent first; key breaks ties so the result is stable
    ranked.sort_by(|(ka, a), (kb, b)| b.count.cmp(&a.count).then(ka.cmp(kb)));
    ranked.truncate(config.palette_limit);
    ranked.reverse();

    tracing::debug!(swatches = ranked.len(), "extracted palette");

    ranked
        .into_iter()
        .map(|(_, bin)| {
            let [r, g, b] = bin.average();
            let hex = rgb_to_hex(r as u32, g as u32, b as u32);
            Swatch {
                hover: colorscale(&hex, config.hover_scale),
                hex,
                proportion: bin.count as f64 / total as f64,
            }
        })
        .collect()
}

/// Open `path` and extract its palette.
///
/// # Errors
///
/// Any [`DecodeError`] from opening the file.
pub fn extract_palette_from_path(path: &Path, config: &PipelineConfig) -> Result<Vec<Swatch>, DecodeError> {
    let imported = open_image(path)?;
    Ok(extract_palette(&imported.image, config))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
