//! Writing finished images and thumbnails to disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{encode_jpeg, encode_png, EncodeError};
use crate::config::PipelineConfig;
use crate::decode::{resize_to_fit, DecodedImage, FilterType, SourceInfo};

/// Target container of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Jpg,
    Png,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpg => "jpg",
            ExportFormat::Png => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ExportFormat::Jpg),
            "png" => Ok(ExportFormat::Png),
            _ => Err(EncodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Where and how to write an exported image.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// File name without extension
    pub name: String,
    /// Target container
    pub format: ExportFormat,
    /// Existing directory to write into
    pub out_dir: PathBuf,
    /// 1-100; 100 on a JPEG source keeps the source's quality
    pub quality: u8,
}

impl ExportRequest {
    /// Full output path, `<out_dir>/<name>.<ext>`.
    pub fn path(&self) -> PathBuf {
        self.out_dir
            .join(format!("{}.{}", self.name, self.format.extension()))
    }
}

/// Encode `image` and write it according to `request`.
///
/// JPEG exports at quality 100 from a JPEG source reuse the source's
/// estimated quality (or `config.keep_quality_fallback` when unknown) instead
/// of re-encoding at maximum. PNG ignores the quality except that anything
/// below 100 asks for the smallest output.
///
/// # Errors
///
/// Returns `EncodeError::Io` naming the operation and path when the file
/// cannot be written, or an encoding error.
pub fn export_image(
    image: &DecodedImage,
    source: &SourceInfo,
    request: &ExportRequest,
    config: &PipelineConfig,
) -> Result<PathBuf, EncodeError> {
    let bytes = match request.format {
        ExportFormat::Jpg => {
            let quality = resolve_jpeg_quality(request.quality, source, config);
            encode_jpeg(image, quality)?
        }
        ExportFormat::Png => encode_png(image, request.quality < 100)?,
    };

    let path = request.path();
    write_file(&path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        format = %request.format,
        bytes = bytes.len(),
        "exported image"
    );
    Ok(path)
}

/// Save a JPEG thumbnail that fits inside `(width, height)`.
///
/// Aspect ratio is preserved and the image is never enlarged. The file is
/// always `<out_dir>/<name>.jpg`.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero-sized box, and the
/// same errors as [`export_image`] otherwise.
pub fn save_thumbnail(
    image: &DecodedImage,
    name: &str,
    (width, height): (u32, u32),
    out_dir: &Path,
    config: &PipelineConfig,
) -> Result<PathBuf, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let thumbnail = resize_to_fit(image, width, height, FilterType::Lanczos3)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    let bytes = encode_jpeg(&thumbnail, config.thumbnail_quality)?;

    let path = out_dir.join(format!("{}.{}", name, ExportFormat::Jpg.extension()));
    write_file(&path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        width = thumbnail.width,
        height = thumbnail.height,
        "saved thumbnail"
    );
    Ok(path)
}

/// Quality to encode a JPEG export with.
fn resolve_jpeg_quality(requested: u8, source: &SourceInfo, config: &PipelineConfig) -> u8 {
    if requested >= 100 && source.is_jpeg() {
        return source.jpeg_quality.unwrap_or(config.keep_quality_fallback);
    }
    requested.clamp(1, 100)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    std::fs::write(path, bytes).map_err(|source| EncodeError::Io {
        operation: "write",
        path: path.to_path_buf(),
        source,
    })
}
