//! Core types for decoded images.

use std::path::PathBuf;

use image::{ColorType, DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image import.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be read.
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// How pixels are laid out in a [`DecodedImage`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// One gray byte per pixel.
    Luma,
    /// Gray + alpha, two bytes per pixel.
    LumaAlpha,
    /// Red, green, blue, three bytes per pixel.
    Rgb,
    /// Red, green, blue, alpha, four bytes per pixel.
    Rgba,
    /// One byte per pixel indexing into the image's color table.
    Indexed,
}

impl PixelFormat {
    /// Number of bytes per pixel in the buffer.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Luma | PixelFormat::Indexed => 1,
            PixelFormat::LumaAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Number of leading channels that carry color (everything but alpha).
    #[inline]
    pub fn color_channels(self) -> usize {
        match self {
            PixelFormat::Luma | PixelFormat::LumaAlpha | PixelFormat::Indexed => 1,
            PixelFormat::Rgb | PixelFormat::Rgba => 3,
        }
    }

    /// Whether the last channel is alpha.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::LumaAlpha | PixelFormat::Rgba)
    }

    /// Short mode name as shown in the image info panel.
    pub fn mode_name(self) -> &'static str {
        match self {
            PixelFormat::Luma => "L",
            PixelFormat::LumaAlpha => "LA",
            PixelFormat::Rgb => "RGB",
            PixelFormat::Rgba => "RGBA",
            PixelFormat::Indexed => "P",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mode_name())
    }
}

/// A decoded 8-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub format: PixelFormat,
    /// Pixel data in row-major order, `format.channels()` bytes per pixel.
    pub pixels: Vec<u8>,
    /// RGB lookup table for `PixelFormat::Indexed` images.
    pub color_table: Option<Vec<[u8; 3]>>,
}

impl DecodedImage {
    /// Create a new RGB image with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::with_format(width, height, PixelFormat::Rgb, pixels)
    }

    /// Create an image with an explicit (non-indexed) pixel format.
    pub fn with_format(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * format.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            format,
            pixels,
            color_table: None,
        }
    }

    /// Create a palette-indexed image from one index byte per pixel.
    pub fn indexed(width: u32, height: u32, indices: Vec<u8>, table: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(indices.len(), width as usize * height as usize);
        Self {
            width,
            height,
            format: PixelFormat::Indexed,
            pixels: indices,
            color_table: Some(table),
        }
    }

    /// Convert any decoded `image` crate buffer to an 8-bit DecodedImage.
    ///
    /// Higher bit depths are reduced to 8 bits per channel; exotic layouts
    /// fall back to RGBA.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (format, pixels) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::Luma, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::LumaAlpha, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba, buf.into_raw()),
            other => match other.color() {
                ColorType::L16 => (PixelFormat::Luma, other.to_luma8().into_raw()),
                ColorType::La16 => (PixelFormat::LumaAlpha, other.to_luma_alpha8().into_raw()),
                ColorType::Rgb16 | ColorType::Rgb32F => (PixelFormat::Rgb, other.to_rgb8().into_raw()),
                _ => (PixelFormat::Rgba, other.to_rgba8().into_raw()),
            },
        };
        Self::with_format(width, height, format, pixels)
    }

    /// Convert to an `image` crate buffer. Indexed images are expanded to RGB.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        let truecolor = self.to_truecolor();
        let (w, h) = (truecolor.width, truecolor.height);
        let pixels = truecolor.pixels;
        match truecolor.format {
            PixelFormat::Luma => image::GrayImage::from_raw(w, h, pixels).map(DynamicImage::ImageLuma8),
            PixelFormat::LumaAlpha => {
                image::GrayAlphaImage::from_raw(w, h, pixels).map(DynamicImage::ImageLumaA8)
            }
            PixelFormat::Rgb => image::RgbImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgb8),
            PixelFormat::Rgba => image::RgbaImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgba8),
            PixelFormat::Indexed => None,
        }
    }

    /// Expand an indexed image to RGB; any other format is returned as-is.
    ///
    /// Indices beyond the color table map to black.
    pub fn to_truecolor(&self) -> DecodedImage {
        if self.format != PixelFormat::Indexed {
            return self.clone();
        }
        let table = self.color_table.as_deref().unwrap_or(&[]);
        let mut pixels = Vec::with_capacity(self.pixels.len() * 3);
        for &index in &self.pixels {
            let rgb = table.get(index as usize).copied().unwrap_or([0, 0, 0]);
            pixels.extend_from_slice(&rgb);
        }
        DecodedImage::with_format(self.width, self.height, PixelFormat::Rgb, pixels)
    }

    /// Copy into a plain RGB image, dropping alpha and expanding gray.
    pub fn to_rgb(&self) -> DecodedImage {
        let truecolor = self.to_truecolor();
        let pixels = match truecolor.format {
            PixelFormat::Rgb => return truecolor,
            PixelFormat::Rgba => truecolor
                .pixels
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect(),
            PixelFormat::Luma | PixelFormat::LumaAlpha | PixelFormat::Indexed => truecolor
                .pixels
                .chunks_exact(truecolor.format.channels())
                .flat_map(|p| [p[0], p[0], p[0]])
                .collect(),
        };
        DecodedImage::with_format(self.width, self.height, PixelFormat::Rgb, pixels)
    }

    /// Number of channels per pixel in the buffer.
    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Facts about the file an image was imported from.
#[derive(Debug, Clone, Default)]
pub struct SourceInfo {
    /// Path the image was read from, if it came from disk.
    pub path: Option<PathBuf>,
    /// Container format as detected from the file contents.
    pub format: Option<ImageFormat>,
    /// File size in bytes.
    pub file_size: u64,
    /// Pixel format before any conversion to 8-bit.
    pub original_format: Option<PixelFormat>,
    /// Bits per channel in the source (8 or 16 for most files).
    pub bit_depth: u8,
    /// Raw EXIF block, when the container carries one.
    pub exif: Option<Vec<u8>>,
    /// Estimated JPEG quality, for JPEG sources with standard tables.
    pub jpeg_quality: Option<u8>,
}

impl SourceInfo {
    /// Whether the source container is JPEG.
    pub fn is_jpeg(&self) -> bool {
        self.format == Some(ImageFormat::Jpeg)
    }

    /// Uppercase container name ("JPEG", "PNG", ...), or "UNKNOWN".
    pub fn format_name(&self) -> String {
        match self.format {
            Some(ImageFormat::Jpeg) => "JPEG".to_string(),
            Some(ImageFormat::Png) => "PNG".to_string(),
            Some(ImageFormat::Tiff) => "TIFF".to_string(),
            Some(other) => format!("{:?}", other).to_uppercase(),
            None => "UNKNOWN".to_string(),
        }
    }

    /// File name component of the source path.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// An imported original image plus the facts about its source.
#[derive(Debug, Clone)]
pub struct ImportedImage {
    /// The decoded, never-mutated original.
    pub image: DecodedImage,
    /// Source file facts.
    pub source: SourceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_pixel_format_channels() {
        assert_eq!(PixelFormat::Luma.channels(), 1);
        assert_eq!(PixelFormat::LumaAlpha.channels(), 2);
        assert_eq!(PixelFormat::Rgb.channels(), 3);
        assert_eq!(PixelFormat::Rgba.channels(), 4);
        assert_eq!(PixelFormat::Indexed.channels(), 1);
        assert!(PixelFormat::Rgba.has_alpha());
        assert!(!PixelFormat::Rgb.has_alpha());
        assert_eq!(PixelFormat::Rgba.to_string(), "RGBA");
    }

    #[test]
    fn test_decoded_image_creation() {
        let pixels = vec![0u8; 100 * 50 * 3];
        let img = DecodedImage::new(100, 50, pixels);

        assert_eq!(img.width, 100);
        assert_eq!(img.height, 50);
        assert_eq!(img.format, PixelFormat::Rgb);
        assert_eq!(img.pixel_count(), 5000);
        assert_eq!(img.byte_size(), 15000);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_decoded_image_empty() {
        let img = DecodedImage::new(0, 0, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_indexed_to_truecolor() {
        let table = vec![[255, 0, 0], [0, 0, 255]];
        let img = DecodedImage::indexed(3, 1, vec![0, 1, 7], table);
        let rgb = img.to_truecolor();

        assert_eq!(rgb.format, PixelFormat::Rgb);
        assert_eq!(rgb.pixels, vec![255, 0, 0, 0, 0, 255, 0, 0, 0]);
        assert!(rgb.color_table.is_none());
    }

    #[test]
    fn test_to_rgb_drops_alpha_and_expands_gray() {
        let rgba = DecodedImage::with_format(1, 1, PixelFormat::Rgba, vec![1, 2, 3, 4]);
        assert_eq!(rgba.to_rgb().pixels, vec![1, 2, 3]);

        let gray = DecodedImage::with_format(2, 1, PixelFormat::LumaAlpha, vec![9, 0, 7, 255]);
        assert_eq!(gray.to_rgb().pixels, vec![9, 9, 9, 7, 7, 7]);
    }

    #[test]
    fn test_dynamic_round_trip_keeps_format() {
        let img = DecodedImage::with_format(2, 1, PixelFormat::LumaAlpha, vec![10, 20, 30, 40]);
        let back = DecodedImage::from_dynamic(img.to_dynamic().unwrap());
        assert_eq!(back, img);
    }

    #[test]
    fn test_from_dynamic_reduces_16_bit() {
        let buf = image::ImageBuffer::<image::Rgb<u16>, Vec<u16>>::from_pixel(
            1,
            1,
            image::Rgb([65535, 0, 32896]),
        );
        let img = DecodedImage::from_dynamic(DynamicImage::ImageRgb16(buf));
        assert_eq!(img.format, PixelFormat::Rgb);
        assert_eq!(img.pixels, vec![255, 0, 128]);
    }

    #[test]
    fn test_source_info_names() {
        let info = SourceInfo {
            path: Some(PathBuf::from("/tmp/photos/cat.jpg")),
            format: Some(ImageFormat::Jpeg),
            ..Default::default()
        };
        assert!(info.is_jpeg());
        assert_eq!(info.format_name(), "JPEG");
        assert_eq!(info.file_name().as_deref(), Some("cat.jpg"));
        assert_eq!(SourceInfo::default().format_name(), "UNKNOWN");
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::CorruptedFile("truncated".to_string());
        assert_eq!(err.to_string(), "Corrupted or incomplete image file: truncated");

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
