//! JPEG encoding for export and thumbnails.
//!
//! This module provides JPEG encoding using the `image` crate's JPEG encoder.
//! JPEG carries no alpha and no color table, so images are flattened to
//! gray or RGB before encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_buffer, EncodeError};
use crate::decode::{DecodedImage, PixelFormat};

/// Encode an image to JPEG bytes.
///
/// # Arguments
///
/// * `image` - Image to encode, in any pixel format
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// Gray images stay single-channel; alpha is dropped and indexed images are
/// expanded to RGB.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 75-90: Good quality (thumbnails are written at 75)
/// * Below 60: Low quality, visible artifacts
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero-sized image,
/// `EncodeError::InvalidPixelData` if the buffer does not match the
/// dimensions, and `EncodeError::EncodingFailed` if the encoder fails.
///
/// # Example
///
/// ```ignore
/// use darkroom_core::encode::encode_jpeg;
///
/// let image = DecodedImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
/// let jpeg = encode_jpeg(&image, 90)?;
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(image)?;

    let (pixels, color_type) = jpeg_layout(image);

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&pixels, image.width, image.height, color_type)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Flatten to a layout JPEG can hold.
fn jpeg_layout(image: &DecodedImage) -> (Vec<u8>, ExtendedColorType) {
    match image.format {
        PixelFormat::Luma => (image.pixels.clone(), ExtendedColorType::L8),
        PixelFormat::LumaAlpha => (
            image.pixels.chunks_exact(2).map(|p| p[0]).collect(),
            ExtendedColorType::L8,
        ),
        PixelFormat::Rgb | PixelFormat::Rgba | PixelFormat::Indexed => {
            (image.to_rgb().pixels, ExtendedColorType::Rgb8)
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
