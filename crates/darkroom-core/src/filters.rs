//! Neighbourhood filters: Gaussian blur, unsharp mask and the fixed 3x3
//! artistic kernels.

use crate::color::clamp;
use crate::decode::DecodedImage;
use crate::ArtisticEffect;

/// Gaussian blur with standard deviation `sigma`.
///
/// Every channel, alpha included, is blurred. `sigma <= 0` returns a copy.
/// Indexed images are expanded to RGB first.
pub fn gaussian_blur(image: &DecodedImage, sigma: f32) -> DecodedImage {
    if sigma.is_nan() || sigma <= 0.0 {
        return image.clone();
    }
    match image.to_dynamic() {
        Some(dynamic) => DecodedImage::from_dynamic(dynamic.blur(sigma)),
        None => image.clone(),
    }
}

/// Unsharp mask: push each color channel away from its blurred value.
///
/// For a channel value `v` with blurred value `b`, `diff = v - b`; when
/// `|diff| >= threshold` the output is `clip(v + diff * percent / 100)`,
/// otherwise `v`. Alpha is untouched.
pub fn unsharp_mask(image: &DecodedImage, radius: f32, percent: u32, threshold: u8) -> DecodedImage {
    let source = image.to_truecolor();
    if radius.is_nan() || radius <= 0.0 {
        return source;
    }

    let blurred = gaussian_blur(&source, radius);
    let channels = source.channels();
    let color_channels = source.format.color_channels();
    let percent = percent as i64;
    let threshold = threshold as i64;

    let mut output = source.clone();
    for (out, blur) in output
        .pixels
        .chunks_exact_mut(channels)
        .zip(blurred.pixels.chunks_exact(channels))
    {
        for c in 0..color_channels {
            let v = out[c] as i64;
            let diff = v - blur[c] as i64;
            if diff.abs() >= threshold {
                out[c] = (v + diff * percent / 100).clamp(0, 255) as u8;
            }
        }
    }
    output
}

/// A 3x3 convolution kernel with its normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Row-major weights
    pub weights: [f64; 9],
    /// Divisor applied to the weighted sum
    pub scale: f64,
    /// Added after scaling
    pub offset: f64,
}

impl ArtisticEffect {
    /// The fixed kernel behind this effect; `None` has no kernel.
    pub fn kernel(self) -> Option<Kernel> {
        let edges = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
        match self {
            ArtisticEffect::None => None,
            ArtisticEffect::Emboss => Some(Kernel {
                weights: [-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
                scale: 1.0,
                offset: 128.0,
            }),
            ArtisticEffect::FindEdges => Some(Kernel {
                weights: edges,
                scale: 1.0,
                offset: 0.0,
            }),
            ArtisticEffect::Contour => Some(Kernel {
                weights: edges,
                scale: 1.0,
                offset: 255.0,
            }),
            ArtisticEffect::EdgeEnhance => Some(Kernel {
                weights: [-1.0, -1.0, -1.0, -1.0, 10.0, -1.0, -1.0, -1.0, -1.0],
                scale: 2.0,
                offset: 0.0,
            }),
        }
    }
}

/// Apply a 3x3 kernel to every color channel.
///
/// `out = round(sum(w * in) / scale + offset)`, clipped to [0, 255]. The
/// one-pixel border is copied unchanged, as is alpha. Images narrower or
/// shorter than 3 pixels come back unchanged.
pub fn apply_kernel(image: &DecodedImage, kernel: &Kernel) -> DecodedImage {
    let source = image.to_truecolor();
    let (w, h) = (source.width as usize, source.height as usize);
    if w < 3 || h < 3 {
        return source;
    }

    let channels = source.channels();
    let color_channels = source.format.color_channels();
    let mut output = source.clone();

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            for c in 0..color_channels {
                let mut sum = 0.0;
                for ky in 0..3 {
                    let row = (y + ky - 1) * w;
                    for kx in 0..3 {
                        let idx = (row + x + kx - 1) * channels + c;
                        sum += kernel.weights[ky * 3 + kx] * source.pixels[idx] as f64;
                    }
                }
                let value = sum / kernel.scale + kernel.offset;
                output.pixels[(y * w + x) * channels + c] = clamp((value + 0.5).floor());
            }
        }
    }
    output
}

/// Apply an artistic effect; `ArtisticEffect::None` returns a copy.
pub fn apply_effect(image: &DecodedImage, effect: ArtisticEffect) -> DecodedImage {
    match effect.kernel() {
        Some(kernel) => apply_kernel(image, &kernel),
        None => image.clone(),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn rgb_image() -> impl Strategy<Value = DecodedImage> {
        (1u32..=10, 1u32..=10).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |pixels| DecodedImage::new(w, h, pixels))
        })
    }

    fn effect_strategy() -> impl Strategy<Value = ArtisticEffect> {
        prop_oneof![
            Just(ArtisticEffect::Emboss),
            Just(ArtisticEffect::FindEdges),
            Just(ArtisticEffect::Contour),
            Just(ArtisticEffect::EdgeEnhance),
        ]
    }

    proptest! {
        /// Property: Kernels keep dimensions and copy the border.
        #[test]
        fn prop_kernel_copies_border(img in rgb_image(), effect in effect_strategy()) {
            let result = apply_effect(&img, effect);
            prop_assert_eq!((result.width, result.height), (img.width, img.height));

            let w = img.width as usize;
            let h = img.height as usize;
            for y in 0..h {
                for x in 0..w {
                    if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                        let i = (y * w + x) * 3;
                        prop_assert_eq!(&result.pixels[i..i + 3], &img.pixels[i..i + 3]);
                    }
                }
            }
        }

        /// Property: Filters are deterministic.
        #[test]
        fn prop_filters_deterministic(img in rgb_image(), sigma in 0.0f32..3.0) {
            prop_assert_eq!(gaussian_blur(&img, sigma), gaussian_blur(&img, sigma));
            prop_assert_eq!(
                unsharp_mask(&img, sigma, 150, 3),
                unsharp_mask(&img, sigma, 150, 3)
            );
        }

        /// Property: Blur keeps dimensions.
        #[test]
        fn prop_blur_keeps_dimensions(img in rgb_image(), sigma in 0.1f32..4.0) {
            let result = gaussian_blur(&img, sigma);
            prop_assert_eq!((result.width, result.height), (img.width, img.height));
            prop_assert_eq!(result.pixels.len(), img.pixels.len());
        }
    }
}
