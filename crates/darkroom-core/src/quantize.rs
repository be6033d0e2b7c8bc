//! Median-cut color quantization for the posterize stage.
//!
//! The distinct colors of the image (with their pixel counts) start in one
//! box. The box with the widest channel range is repeatedly split at the
//! weighted median of that channel until the requested number of boxes
//! exists or no box can be split. Each box contributes its weighted mean as
//! a palette entry, and every pixel is mapped to the nearest entry.

use std::collections::HashMap;

use crate::decode::{DecodedImage, PixelFormat};

/// A run of distinct colors with their pixel counts.
struct ColorBox {
    colors: Vec<([u8; 3], u32)>,
}

impl ColorBox {
    /// (channel, range) of the widest channel.
    fn widest_channel(&self) -> (usize, u8) {
        (0..3)
            .map(|c| {
                let (min, max) = self
                    .colors
                    .iter()
                    .fold((u8::MAX, u8::MIN), |(lo, hi), (rgb, _)| {
                        (lo.min(rgb[c]), hi.max(rgb[c]))
                    });
                (c, max.saturating_sub(min))
            })
            .fold((0, 0), |best, cur| if cur.1 > best.1 { cur } else { best })
    }

    /// Split at the weighted median of the widest channel.
    ///
    /// The box must hold at least two colors; both halves keep one or more.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (channel, _) = self.widest_channel();
        self.colors.sort_by_key(|(rgb, _)| (rgb[channel], *rgb));

        let total: u64 = self.colors.iter().map(|(_, n)| *n as u64).sum();
        let mut running = 0u64;
        let mut cut = self.colors.len() - 1;
        for (i, (_, n)) in self.colors.iter().enumerate() {
            running += *n as u64;
            if running * 2 >= total {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.colors.len() - 1);

        let upper = self.colors.split_off(cut);
        (self, ColorBox { colors: upper })
    }

    /// Pixel-count weighted mean color, rounded.
    fn average(&self) -> [u8; 3] {
        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for (rgb, n) in &self.colors {
            for c in 0..3 {
                sum[c] += rgb[c] as u64 * *n as u64;
            }
            count += *n as u64;
        }
        if count == 0 {
            return [0, 0, 0];
        }
        [
            ((sum[0] + count / 2) / count) as u8,
            ((sum[1] + count / 2) / count) as u8,
            ((sum[2] + count / 2) / count) as u8,
        ]
    }
}

/// Choose up to `max_colors` representative colors with median cut.
///
/// The result has fewer entries when the colors run out. Deterministic for
/// a given input.
pub fn median_cut(colors: &[[u8; 3]], max_colors: usize) -> Vec<[u8; 3]> {
    if colors.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    // Distinct colors with counts, in a stable order
    let mut sorted = colors.to_vec();
    sorted.sort_unstable();
    let mut distinct: Vec<([u8; 3], u32)> = Vec::new();
    for rgb in sorted {
        match distinct.last_mut() {
            Some((last, n)) if *last == rgb => *n += 1,
            _ => distinct.push((rgb, 1)),
        }
    }

    let mut boxes = vec![ColorBox { colors: distinct }];

    while boxes.len() < max_colors {
        // Widest splittable box first; earliest wins ties
        let Some(index) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.colors.len() > 1)
            .max_by(|(ia, a), (ib, b)| {
                a.widest_channel()
                    .1
                    .cmp(&b.widest_channel().1)
                    .then(ib.cmp(ia))
            })
            .map(|(i, _)| i)
        else {
            break;
        };

        let (low, high) = boxes.remove(index).split();
        boxes.insert(index, high);
        boxes.insert(index, low);
    }

    boxes.iter().map(ColorBox::average).collect()
}

/// Index of the palette entry closest to `rgb` (squared distance).
fn nearest(palette: &[[u8; 3]], rgb: [u8; 3]) -> u8 {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, entry) in palette.iter().enumerate() {
        let dist: u32 = (0..3)
            .map(|c| {
                let d = entry[c] as i32 - rgb[c] as i32;
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best as u8
}

/// Reduce an image to at most `max_colors` colors.
///
/// The result is an [`PixelFormat::Indexed`] image whose table holds the
/// chosen colors. Images with alpha keep it and come back as RGBA with the
/// quantized colors, since an indexed buffer has no room for alpha.
pub fn posterize(image: &DecodedImage, max_colors: usize) -> DecodedImage {
    let truecolor = image.to_truecolor();
    let channels = truecolor.channels();
    let has_alpha = truecolor.format.has_alpha();

    let colors: Vec<[u8; 3]> = truecolor
        .pixels
        .chunks_exact(channels)
        .map(|p| match truecolor.format {
            PixelFormat::Luma | PixelFormat::LumaAlpha => [p[0], p[0], p[0]],
            _ => [p[0], p[1], p[2]],
        })
        .collect();

    let palette = median_cut(&colors, max_colors.min(256));
    tracing::debug!(requested = max_colors, chosen = palette.len(), "posterize palette");

    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let indices: Vec<u8> = colors
        .iter()
        .map(|&rgb| *lookup.entry(rgb).or_insert_with(|| nearest(&palette, rgb)))
        .collect();

    if has_alpha {
        let mut pixels = Vec::with_capacity(indices.len() * 4);
        for (index, pixel) in indices.iter().zip(truecolor.pixels.chunks_exact(channels)) {
            let rgb = palette.get(*index as usize).copied().unwrap_or([0, 0, 0]);
            pixels.extend_from_slice(&rgb);
            pixels.push(pixel[channels - 1]);
        }
        return DecodedImage::with_format(image.width, image.height, PixelFormat::Rgba, pixels);
    }

    DecodedImage::indexed(image.width, image.height, indices, palette)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
