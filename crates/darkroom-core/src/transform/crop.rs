//! Image cropping operations.
//!
//! The Zoom stage "zooms in" by cutting a uniform border off every edge.
//!
//! # Example
//!
//! ```ignore
//! // Remove a 10 pixel frame
//! let cropped = apply_zoom(&image, 10.0);
//! ```

use crate::decode::DecodedImage;

/// Crop a pixel rectangle out of an image.
///
/// The rectangle is clamped to the image bounds and is never smaller than
/// 1x1. Indexed images keep their color table.
///
/// # Arguments
///
/// * `image` - Source image to crop
/// * `left`, `top` - Top-left corner of the region, in pixels
/// * `width`, `height` - Size of the region, in pixels
pub fn apply_crop(image: &DecodedImage, left: u32, top: u32, width: u32, height: u32) -> DecodedImage {
    // Fast path: full crop returns a clone
    if left == 0 && top == 0 && width >= image.width && height >= image.height {
        return image.clone();
    }

    // Clamp to image bounds
    let px_left = left.min(image.width.saturating_sub(1));
    let px_top = top.min(image.height.saturating_sub(1));
    let px_right = px_left.saturating_add(width).min(image.width);
    let px_bottom = px_top.saturating_add(height).min(image.height);

    // Ensure minimum dimensions
    let out_width = px_right.saturating_sub(px_left).max(1);
    let out_height = px_bottom.saturating_sub(px_top).max(1);

    let channels = image.channels();
    let row_len = out_width as usize * channels;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    // Copy pixel data row by row
    for y in 0..out_height {
        let src_row = (px_top + y) as usize * image.width as usize;
        let start = (src_row + px_left as usize) * channels;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    DecodedImage {
        width: out_width,
        height: out_height,
        format: image.format,
        pixels: output,
        color_table: image.color_table.clone(),
    }
}

/// Cut `border` pixels (rounded) off all four edges.
///
/// An oversized border is reduced per axis to `(len - 1) / 2`, so the
/// output is never smaller than 1×1 and keeps the central 1-2 pixels of
/// that axis. A 4×4 image zoomed by 50 becomes 2×2.
pub fn apply_zoom(image: &DecodedImage, border: f64) -> DecodedImage {
    let border = if border.is_finite() && border > 0.0 {
        border.round().min(u32::MAX as f64) as u32
    } else {
        0
    };
    if border == 0 {
        return image.clone();
    }

    let bx = border.min(image.width.saturating_sub(1) / 2);
    let by = border.min(image.height.saturating_sub(1) / 2);
    apply_crop(
        image,
        bx,
        by,
        image.width - 2 * bx,
        image.height - 2 * by,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
