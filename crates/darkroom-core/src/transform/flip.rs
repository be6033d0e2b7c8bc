//! Mirroring and flipping.

use crate::decode::DecodedImage;
use crate::Flip;

/// Mirror (left-right) and/or flip (top-bottom) an image.
///
/// `Flip::None` returns a copy. Works on every pixel format since whole
/// pixels are moved, never blended.
pub fn apply_flip(image: &DecodedImage, flip: Flip) -> DecodedImage {
    if flip == Flip::None {
        return image.clone();
    }

    let channels = image.channels();
    let row_len = image.width as usize * channels;
    let mut output = Vec::with_capacity(image.pixels.len());

    let rows: Box<dyn Iterator<Item = &[u8]>> = if flip.flips() {
        Box::new(image.pixels.chunks_exact(row_len).rev())
    } else {
        Box::new(image.pixels.chunks_exact(row_len))
    };

    for row in rows {
        if flip.mirrors() {
            for pixel in row.chunks_exact(channels).rev() {
                output.extend_from_slice(pixel);
            }
        } else {
            output.extend_from_slice(row);
        }
    }

    DecodedImage {
        pixels: output,
        ..image.clone()
    }
}
