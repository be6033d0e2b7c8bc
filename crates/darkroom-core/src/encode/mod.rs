//! Image export for Darkroom.
//!
//! This module provides functionality for:
//! - Encoding images to JPEG with configurable quality
//! - Encoding images to PNG, optionally with maximum compression
//! - Writing exports and fitted JPEG thumbnails to disk
//!
//! # Examples
//!
//! ```ignore
//! use darkroom_core::encode::encode_jpeg;
//!
//! let image = DecodedImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
//! let jpeg_bytes = encode_jpeg(&image, 90)?;
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod export;
mod jpeg;
mod png;

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodedImage;

pub use export::{export_image, save_thumbnail, ExportFormat, ExportRequest};
pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Errors that can occur while encoding or writing an image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Writing the output failed
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Export format is not jpg or png
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Check that the buffer matches the image's dimensions and format.
fn validate_buffer(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.width as usize * image.height as usize * image.channels();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}
