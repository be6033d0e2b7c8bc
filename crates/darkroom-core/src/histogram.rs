//! Per-band histograms of a pixel buffer.
//!
//! Used by the metadata extractor for the entropy figure in the image-info
//! block. Each band of the buffer gets 256 bins; palette-indexed images
//! count their indices as a single band.

use crate::decode::DecodedImage;

/// Histogram data for an image, one 256-bin table per band.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Histogram {
    bands: Vec<[u32; 256]>,
}

impl Histogram {
    /// Create an empty histogram with `band_count` bands.
    pub fn new(band_count: usize) -> Self {
        Self {
            bands: vec![[0; 256]; band_count],
        }
    }

    /// Sum of every bin across all bands.
    pub fn total(&self) -> u64 {
        self.bands
            .iter()
            .flat_map(|band| band.iter())
            .map(|&n| n as u64)
            .sum()
    }

    /// Shannon entropy in bits over the concatenated bins of every band.
    ///
    /// An empty histogram has entropy 0.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        self.bands
            .iter()
            .flat_map(|band| band.iter())
            .filter(|&&n| n > 0)
            .map(|&n| {
                let p = n as f64 / total;
                p * (1.0 / p).log2()
            })
            .sum()
    }
}

/// Count every band of `image`.
///
/// # Performance
/// Single pass over the pixel buffer; 1 KiB of bins per band.
pub fn compute_histogram(image: &DecodedImage) -> Histogram {
    let channels = image.channels();
    let mut hist = Histogram::new(channels);

    if image.is_empty() {
        return hist;
    }

    for pixel in image.pixels.chunks_exact(channels) {
        for (band, &value) in hist.bands.iter_mut().zip(pixel) {
            band[value as usize] += 1;
        }
    }

    hist
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Every band counts each pixel exactly once.
        #[test]
        fn prop_band_totals(pixels in prop::collection::vec(any::<u8>(), 0..300)) {
            let len = pixels.len() / 3 * 3;
            let img = DecodedImage::new((len / 3) as u32, 1, pixels[..len].to_vec());
            let hist = compute_histogram(&img);
            for band in &hist.bands {
                let sum: u64 = band.iter().map(|&n| n as u64).sum();
                prop_assert_eq!(sum, (len / 3) as u64);
            }
        }

        /// Property: Entropy is bounded by log2 of the bin count.
        #[test]
        fn prop_entropy_bounded(pixels in prop::collection::vec(any::<u8>(), 3..300)) {
            let len = pixels.len() / 3 * 3;
            let img = DecodedImage::new((len / 3) as u32, 1, pixels[..len].to_vec());
            let entropy = compute_histogram(&img).entropy();
            prop_assert!(entropy >= 0.0);
            prop_assert!(entropy <= (3.0 * 256.0f64).log2() + 1e-9);
        }
    }
}
