//! Image import from files and byte buffers.

use std::io::Cursor;
use std::path::Path;

use image::{ColorType, ImageReader};

use super::quality::estimate_jpeg_quality;
use super::{DecodeError, DecodedImage, ImportedImage, PixelFormat, SourceInfo};

/// Open and decode an image file.
///
/// The file is read once; pixels, EXIF block and (for JPEG) the encoding
/// quality estimate all come from the same bytes. EXIF orientation is not
/// applied: pixels are kept as stored.
///
/// # Errors
///
/// Returns `DecodeError::Io` when the file cannot be read, otherwise the
/// errors of [`decode_bytes`].
pub fn open_image(path: &Path) -> Result<ImportedImage, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut imported = decode_bytes(&bytes)?;
    imported.source.path = Some(path.to_path_buf());
    tracing::debug!(
        path = %path.display(),
        width = imported.image.width,
        height = imported.image.height,
        format = %imported.image.format,
        "imported image"
    );
    Ok(imported)
}

/// Decode an image held in memory.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the container is not recognized.
/// Returns `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_bytes(bytes: &[u8]) -> Result<ImportedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let color = img.color();
    let source = SourceInfo {
        path: None,
        format: Some(format),
        file_size: bytes.len() as u64,
        original_format: Some(pixel_format_of(color)),
        bit_depth: (color.bits_per_pixel() / color.channel_count().max(1) as u16) as u8,
        exif: extract_exif_block(bytes),
        jpeg_quality: if format == image::ImageFormat::Jpeg {
            estimate_jpeg_quality(bytes)
        } else {
            None
        },
    };

    Ok(ImportedImage {
        image: DecodedImage::from_dynamic(img),
        source,
    })
}

/// Map a decoder color type onto the pixel format it becomes after import.
fn pixel_format_of(color: ColorType) -> PixelFormat {
    match color {
        ColorType::L8 | ColorType::L16 => PixelFormat::Luma,
        ColorType::La8 | ColorType::La16 => PixelFormat::LumaAlpha,
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => PixelFormat::Rgb,
        _ => PixelFormat::Rgba,
    }
}

/// Raw EXIF payload of the container, if any.
fn extract_exif_block(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut cursor = Cursor::new(bytes);
    exif::Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .map(|exif| exif.buf().to_vec())
}
