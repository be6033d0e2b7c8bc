//! Image resizing for thumbnails.
//!
//! Provides resize operations using the `image` crate's algorithms.
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// Indexed images are expanded to RGB first; other formats keep their
/// layout.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// image dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.to_truecolor());
    }

    let dynamic = image
        .to_dynamic()
        .ok_or_else(|| DecodeError::CorruptedFile("Pixel buffer size mismatch".to_string()))?;

    let resized = dynamic.resize_exact(width, height, filter.to_image_filter());
    Ok(DecodedImage::from_dynamic(resized))
}

/// Scale an image down so it fits inside a `max_width x max_height` box.
///
/// Aspect ratio is preserved and images already inside the box are
/// returned unchanged (thumbnails never upscale).
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if either box dimension is zero.
pub fn resize_to_fit(
    image: &DecodedImage,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_width == 0 || max_height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    let (new_width, new_height) =
        calculate_fit_dimensions(image.width, image.height, max_width, max_height);

    resize(image, new_width, new_height, filter)
}

/// Calculate dimensions that fit inside the box while preserving aspect ratio.
///
/// Never grows an image; each side is at least 1 pixel.
fn calculate_fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::PixelFormat;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_zero_dimension() {
        let img = create_test_image(10, 10);
        assert!(resize(&img, 0, 10, FilterType::Bilinear).is_err());
        assert!(resize_to_fit(&img, 10, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_keeps_alpha_format() {
        let img = DecodedImage::with_format(4, 4, PixelFormat::Rgba, vec![200; 4 * 4 * 4]);
        let resized = resize(&img, 2, 2, FilterType::Nearest).unwrap();
        assert_eq!(resized.format, PixelFormat::Rgba);
        assert_eq!(resized.pixels, vec![200; 2 * 2 * 4]);
    }

    #[test]
    fn test_resize_expands_indexed() {
        let img = DecodedImage::indexed(2, 2, vec![0, 1, 1, 0], vec![[10, 20, 30], [40, 50, 60]]);
        let resized = resize(&img, 2, 2, FilterType::Nearest).unwrap();
        assert_eq!(resized.format, PixelFormat::Rgb);
    }

    #[test]
    fn test_fit_landscape_into_square_box() {
        let img = create_test_image(400, 200);
        let thumb = resize_to_fit(&img, 200, 200, FilterType::Bilinear).unwrap();
        assert_eq!((thumb.width, thumb.height), (200, 100));
    }

    #[test]
    fn test_fit_portrait_into_square_box() {
        let img = create_test_image(150, 600);
        let thumb = resize_to_fit(&img, 200, 200, FilterType::Bilinear).unwrap();
        assert_eq!((thumb.width, thumb.height), (50, 200));
    }

    #[test]
    fn test_fit_never_upscales() {
        let img = create_test_image(40, 30);
        let thumb = resize_to_fit(&img, 200, 200, FilterType::Bilinear).unwrap();
        assert_eq!((thumb.width, thumb.height), (40, 30));
        assert_eq!(thumb.pixels, img.pixels);
    }

    #[test]
    fn test_fit_extreme_aspect_keeps_one_pixel() {
        assert_eq!(calculate_fit_dimensions(10_000, 1, 100, 100), (100, 1));
        assert_eq!(calculate_fit_dimensions(1, 10_000, 100, 100), (1, 100));
    }

    #[test]
    fn test_fit_narrow_box() {
        // Width is the binding constraint
        assert_eq!(calculate_fit_dimensions(300, 300, 100, 250), (100, 100));
    }
}
