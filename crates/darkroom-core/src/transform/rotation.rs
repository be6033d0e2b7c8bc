//! Image rotation inside the original bounding box.
//!
//! The rotation uses inverse mapping: for each pixel in the output image,
//! we calculate which source pixel(s) contribute to it and sample there.
//! The canvas is not expanded, so corners of the rotated image are clipped
//! and uncovered output pixels are filled with zeros.
//!
//! For a counter-clockwise rotation by angle θ around the center (cx, cy),
//! with output pixel centers (x + 0.5, y + 0.5):
//! ```text
//! src_x =  (x - cx) * cos(θ) - (y - cy) * sin(θ) + cx
//! src_y =  (x - cx) * sin(θ) + (y - cy) * cos(θ) + cy
//! ```

use crate::config::RotationFilter;
use crate::decode::{DecodedImage, PixelFormat};

/// Round a matrix coefficient so right angles map exactly onto pixel grids.
#[inline]
fn snap(v: f64) -> f64 {
    (v * 1e15).round() / 1e15
}

/// Apply rotation to an image.
///
/// The image is rotated around its center and keeps its dimensions.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
/// * `filter` - Resampling method
///
/// Indexed images keep their color table under nearest-neighbour sampling
/// and are expanded to RGB for bilinear sampling.
///
/// # Example
///
/// ```ignore
/// use darkroom_core::transform::apply_rotation;
///
/// let rotated = apply_rotation(&image, 15.0, RotationFilter::Nearest);
/// ```
pub fn apply_rotation(image: &DecodedImage, angle_degrees: f64, filter: RotationFilter) -> DecodedImage {
    // Fast path: no rotation needed (including multiples of 360)
    if (angle_degrees % 360.0).abs() < 1e-9 {
        return image.clone();
    }

    let expanded;
    let source = if filter == RotationFilter::Bilinear && image.format == PixelFormat::Indexed {
        expanded = image.to_truecolor();
        &expanded
    } else {
        image
    };

    let channels = source.channels();
    let (w, h) = (source.width, source.height);
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;

    let angle_rad = angle_degrees.to_radians();
    let cos = snap(angle_rad.cos());
    let sin = snap(angle_rad.sin());

    let mut output = vec![0u8; w as usize * h as usize * channels];

    for dst_y in 0..h {
        for dst_x in 0..w {
            // Translate destination pixel center to origin at center
            let dx = dst_x as f64 + 0.5 - cx;
            let dy = dst_y as f64 + 0.5 - cy;

            let src_x = dx * cos - dy * sin + cx;
            let src_y = dx * sin + dy * cos + cy;

            let dst_idx = (dst_y as usize * w as usize + dst_x as usize) * channels;
            let pixel = &mut output[dst_idx..dst_idx + channels];

            match filter {
                RotationFilter::Nearest => sample_nearest(source, src_x, src_y, pixel),
                RotationFilter::Bilinear => sample_bilinear(source, src_x, src_y, pixel),
            }
        }
    }

    DecodedImage {
        width: w,
        height: h,
        format: source.format,
        pixels: output,
        color_table: source.color_table.clone(),
    }
}

/// Whether a continuous coordinate falls inside the source image.
#[inline]
fn inside(image: &DecodedImage, x: f64, y: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x < image.width as f64 && y < image.height as f64
}

/// Copy the source pixel containing (x, y); leave `out` zeroed outside.
fn sample_nearest(image: &DecodedImage, x: f64, y: f64, out: &mut [u8]) {
    if !inside(image, x, y) {
        return;
    }
    let channels = out.len();
    let idx = (y as usize * image.width as usize + x as usize) * channels;
    out.copy_from_slice(&image.pixels[idx..idx + channels]);
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixel centers and weights
/// their contribution based on distance. Neighbours past the edge repeat
/// the edge pixel.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64, out: &mut [u8]) {
    if !inside(image, x, y) {
        return;
    }

    let channels = out.len();
    let max_x = image.width as usize - 1;
    let max_y = image.height as usize - 1;

    // Pixel centers sit at half-integer coordinates
    let xs = (x - 0.5).max(0.0);
    let ys = (y - 0.5).max(0.0);
    let x0 = (xs.floor() as usize).min(max_x);
    let y0 = (ys.floor() as usize).min(max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);

    // Fractional distances
    let fx = xs - x0 as f64;
    let fy = ys - y0 as f64;

    let at = |px: usize, py: usize, c: usize| -> f64 {
        image.pixels[(py * image.width as usize + px) * channels + c] as f64
    };

    for (c, value) in out.iter_mut().enumerate() {
        let v = at(x0, y0, c) * (1.0 - fx) * (1.0 - fy)
            + at(x1, y0, c) * fx * (1.0 - fy)
            + at(x0, y1, c) * (1.0 - fx) * fy
            + at(x1, y1, c) * fx * fy;
        *value = v.clamp(0.0, 255.0).round() as u8;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
