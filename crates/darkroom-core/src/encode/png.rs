//! PNG encoding for export.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_buffer, EncodeError};
use crate::decode::{DecodedImage, PixelFormat};

/// Encode an image to PNG bytes.
///
/// Gray, gray+alpha, RGB and RGBA are written as-is; indexed images are
/// expanded to RGB. `optimize` trades speed for the smallest output.
///
/// # Errors
///
/// Same conditions as [`super::encode_jpeg`].
pub fn encode_png(image: &DecodedImage, optimize: bool) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(image)?;

    let truecolor = image.to_truecolor();
    let color_type = match truecolor.format {
        PixelFormat::Luma => ExtendedColorType::L8,
        PixelFormat::LumaAlpha => ExtendedColorType::La8,
        PixelFormat::Rgba => ExtendedColorType::Rgba8,
        PixelFormat::Rgb | PixelFormat::Indexed => ExtendedColorType::Rgb8,
    };

    let compression = if optimize {
        CompressionType::Best
    } else {
        CompressionType::Default
    };

    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut buffer, compression, FilterType::Adaptive);
    encoder
        .write_image(&truecolor.pixels, image.width, image.height, color_type)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
