//! Image import for Darkroom.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and TIFF files into 8-bit pixel buffers
//! - Recording source facts (container, size, bit depth, EXIF block)
//! - Estimating the encoding quality of JPEG sources
//! - Image resizing for thumbnails
//!
//! # Architecture
//!
//! The imported image is the untouched original of an edit session. It is
//! never mutated; every pipeline pass starts from a copy of it.
//!
//! # Examples
//!
//! ```ignore
//! use darkroom_core::decode::open_image;
//!
//! let imported = open_image(Path::new("photo.jpg"))?;
//! println!("Decoded {}x{} image", imported.image.width, imported.image.height);
//! ```

mod quality;
mod reader;
mod resize;
mod types;

pub use quality::estimate_jpeg_quality;
pub use reader::{decode_bytes, open_image};
pub use resize::{resize, resize_to_fit};
pub use types::{DecodeError, DecodedImage, FilterType, ImportedImage, PixelFormat, SourceInfo};
