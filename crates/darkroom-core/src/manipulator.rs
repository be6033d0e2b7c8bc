//! The pipeline driver.
//!
//! [`ImageManipulator`] holds one working image and applies the stages in
//! their fixed order. [`render`] is the pure entry point: every call starts
//! from the untouched original, so the result depends only on the original
//! and the parameter set, never on earlier renders.
//!
//! ## Stage Order
//! 1. Rotate
//! 2. Zoom
//! 3. Flip
//! 4. Brightness
//! 5. Vibrance
//! 6. Grayscale
//! 7. Invert
//! 8. Sepia
//! 9. 4-color posterize
//! 10. Blur
//! 11. Contrast
//! 12. Balance
//! 13. Hue
//! 14. Artistic effect

use thiserror::Error;

use crate::adjustments::{
    apply_brightness, apply_grayscale, apply_hue, apply_invert, apply_saturation_blend,
    apply_sepia,
};
use crate::config::PipelineConfig;
use crate::decode::{DecodedImage, ImportedImage, PixelFormat, SourceInfo};
use crate::filters::{apply_effect, gaussian_blur, unsharp_mask};
use crate::params::{ParamError, ParamGroup, ParamValue};
use crate::quantize::posterize;
use crate::transform::{apply_flip, apply_rotation, apply_zoom};
use crate::{ArtisticEffect, EditParams, Flip};

/// Errors raised while running the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// A stage cannot handle the working image's pixel format.
    #[error("{stage} is not supported for {format} images")]
    UnsupportedOperation {
        stage: &'static str,
        format: PixelFormat,
    },

    /// The parameter set is outside a stage's domain.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ParamError),
}

/// Applies pipeline stages to a working image.
///
/// Each `apply_*` call replaces the working image with the stage's output
/// and does nothing when given the stage's identity value.
#[derive(Debug)]
pub struct ImageManipulator<'a> {
    working: DecodedImage,
    config: &'a PipelineConfig,
    applied: Vec<&'static str>,
}

impl<'a> ImageManipulator<'a> {
    /// Start from a copy of `original`.
    ///
    /// Palette-indexed originals are converted to RGB up front.
    pub fn new(original: &DecodedImage, config: &'a PipelineConfig) -> Self {
        Self {
            working: original.to_truecolor(),
            config,
            applied: Vec::new(),
        }
    }

    fn replace(&mut self, stage: &'static str, image: DecodedImage) {
        self.working = image;
        self.applied.push(stage);
    }

    /// Rotate counter-clockwise by `degrees`, keeping the canvas size.
    pub fn apply_rotate(&mut self, degrees: f32) {
        if degrees == 0.0 {
            return;
        }
        let rotated = apply_rotation(&self.working, degrees as f64, self.config.rotation_filter);
        self.replace("rotate", rotated);
    }

    /// Crop `border` pixels from every edge.
    pub fn apply_zoom(&mut self, border: f32) {
        if border == 0.0 {
            return;
        }
        let cropped = apply_zoom(&self.working, border as f64);
        self.replace("zoom", cropped);
    }

    /// Mirror and/or flip.
    pub fn apply_flip(&mut self, flip: Flip) {
        if flip == Flip::None {
            return;
        }
        let flipped = apply_flip(&self.working, flip);
        self.replace("flip", flipped);
    }

    /// Scale brightness by `factor`.
    pub fn apply_brightness(&mut self, factor: f32) {
        if factor == 1.0 {
            return;
        }
        let adjusted = apply_brightness(&self.working, factor as f64);
        self.replace("brightness", adjusted);
    }

    /// Blend toward gray (factor < 1) or oversaturate (factor > 1).
    pub fn apply_vibrance(&mut self, factor: f32) {
        if factor == 1.0 {
            return;
        }
        let adjusted = apply_saturation_blend(&self.working, factor as f64);
        self.replace("vibrance", adjusted);
    }

    /// Convert to single-channel gray.
    pub fn apply_grayscale(&mut self, enabled: bool) {
        if !enabled {
            return;
        }
        let gray = apply_grayscale(&self.working);
        self.replace("grayscale", gray);
    }

    /// Photographic negative.
    ///
    /// # Errors
    ///
    /// `StageError::UnsupportedOperation` when the working image is not gray
    /// or RGB; the working image is left as it was.
    pub fn apply_invert(&mut self, enabled: bool) -> Result<(), StageError> {
        if !enabled {
            return Ok(());
        }
        let inverted = apply_invert(&self.working)?;
        self.replace("invert", inverted);
        Ok(())
    }

    /// Warm monochrome tone.
    pub fn apply_sepia(&mut self, enabled: bool) {
        if !enabled {
            return;
        }
        let toned = apply_sepia(&self.working, self.config.sepia_base);
        self.replace("sepia", toned);
    }

    /// Reduce to the configured number of representative colors.
    pub fn apply_four_color(&mut self, enabled: bool) {
        if !enabled {
            return;
        }
        let reduced = posterize(&self.working, self.config.posterize_colors);
        self.replace("4-color", reduced);
    }

    /// Gaussian blur with standard deviation `radius`.
    pub fn apply_blur(&mut self, radius: f32) {
        if radius == 0.0 {
            return;
        }
        let blurred = gaussian_blur(&self.working, radius);
        self.replace("blur", blurred);
    }

    /// Unsharp-mask contrast with radius `amount`.
    pub fn apply_contrast(&mut self, amount: f32) {
        if amount == 0.0 {
            return;
        }
        let sharpened = unsharp_mask(
            &self.working,
            amount,
            self.config.unsharp_percent,
            self.config.unsharp_threshold,
        );
        self.replace("contrast", sharpened);
    }

    /// Color balance enhancement; skipped entirely at 0.
    pub fn apply_balance(&mut self, amount: f32) {
        if amount == 0.0 {
            return;
        }
        let adjusted = apply_saturation_blend(&self.working, amount as f64);
        self.replace("balance", adjusted);
    }

    /// Rotate hue by `degrees`.
    pub fn apply_hue(&mut self, degrees: i32) {
        if degrees == 0 {
            return;
        }
        let shifted = apply_hue(&self.working, degrees);
        self.replace("hue", shifted);
    }

    /// Fixed-kernel artistic effect.
    pub fn apply_effect(&mut self, effect: ArtisticEffect) {
        if effect == ArtisticEffect::None {
            return;
        }
        let filtered = apply_effect(&self.working, effect);
        self.replace("effect", filtered);
    }

    /// Run every stage in pipeline order.
    ///
    /// Stops at the first failing stage; stages already applied stay applied.
    pub fn apply_all(&mut self, params: &EditParams) -> Result<(), StageError> {
        self.apply_rotate(params.rotate);
        self.apply_zoom(params.zoom);
        self.apply_flip(params.flip);
        self.apply_brightness(params.brightness);
        self.apply_vibrance(params.vibrance);
        self.apply_grayscale(params.grayscale);
        self.apply_invert(params.invert)?;
        self.apply_sepia(params.sepia);
        self.apply_four_color(params.four_color);
        self.apply_blur(params.blur);
        self.apply_contrast(params.contrast);
        self.apply_balance(params.balance);
        self.apply_hue(params.hue);
        self.apply_effect(params.effect);
        Ok(())
    }

    /// Names of the stages that changed the image, in order.
    pub fn applied_stages(&self) -> &[&'static str] {
        &self.applied
    }

    /// The current working image.
    pub fn image_result(&self) -> &DecodedImage {
        &self.working
    }

    /// Take the working image.
    pub fn into_result(self) -> DecodedImage {
        self.working
    }
}

/// Render `params` onto a fresh copy of `original`.
///
/// # Errors
///
/// `StageError::InvalidParameters` if a value is outside its domain,
/// `StageError::UnsupportedOperation` if a stage rejects the pixel format.
pub fn render(
    original: &DecodedImage,
    params: &EditParams,
    config: &PipelineConfig,
) -> Result<DecodedImage, StageError> {
    params.validate()?;

    let mut manipulator = ImageManipulator::new(original, config);
    if let Err(e) = manipulator.apply_all(params) {
        tracing::warn!(error = %e, "pipeline stage failed");
        return Err(e);
    }

    let result = manipulator.image_result();
    tracing::debug!(
        stages = ?manipulator.applied_stages(),
        width = result.width,
        height = result.height,
        format = %result.format,
        "rendered image"
    );
    Ok(manipulator.into_result())
}

/// One image being edited: the original plus the last good render.
#[derive(Debug, Clone)]
pub struct EditSession {
    original: ImportedImage,
    config: PipelineConfig,
    params: EditParams,
    current: DecodedImage,
}

impl EditSession {
    /// Open a session on an imported image with every parameter at default.
    pub fn new(original: ImportedImage, config: PipelineConfig) -> Self {
        let current = ImageManipulator::new(&original.image, &config).into_result();
        Self {
            original,
            config,
            params: EditParams::default(),
            current,
        }
    }

    /// Re-render from the original with a new parameter set.
    ///
    /// On success the new image and parameters become current. On failure
    /// both stay as they were and the error is returned.
    pub fn update(&mut self, params: EditParams) -> Result<&DecodedImage, StageError> {
        let rendered = render(&self.original.image, &params, &self.config)?;
        self.current = rendered;
        self.params = params;
        Ok(&self.current)
    }

    /// Change one parameter by name and re-render.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<&DecodedImage, StageError> {
        let mut params = self.params.clone();
        params.set(name, value)?;
        self.update(params)
    }

    /// Restore one control panel's defaults and re-render.
    pub fn revert_group(&mut self, group: ParamGroup) -> Result<&DecodedImage, StageError> {
        let mut params = self.params.clone();
        params.revert(group);
        self.update(params)
    }

    /// Restore every default and re-render.
    pub fn revert(&mut self) -> Result<&DecodedImage, StageError> {
        self.update(EditParams::default())
    }

    /// The untouched imported image.
    pub fn original(&self) -> &DecodedImage {
        &self.original.image
    }

    /// Facts about the imported file.
    pub fn source(&self) -> &SourceInfo {
        &self.original.source
    }

    /// The last successfully rendered image.
    pub fn current(&self) -> &DecodedImage {
        &self.current
    }

    /// The parameters `current()` was rendered with.
    pub fn params(&self) -> &EditParams {
        &self.params
    }

    /// The session's pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[
                    (x * 255 / width.max(1)) as u8,
                    (y * 255 / height.max(1)) as u8,
                    ((x + y) * 7 % 256) as u8,
                ]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn session(image: DecodedImage) -> EditSession {
        EditSession::new(
            ImportedImage {
                image,
                source: SourceInfo::default(),
            },
            PipelineConfig::default(),
        )
    }

    #[test]
    fn test_default_params_render_original() {
        let img = gradient(16, 9);
        let result = render(&img, &EditParams::default(), &PipelineConfig::default()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_indexed_original_becomes_rgb() {
        let img = DecodedImage::indexed(2, 1, vec![0, 1], vec![[1, 2, 3], [4, 5, 6]]);
        let config = PipelineConfig::default();
        let manipulator = ImageManipulator::new(&img, &config);
        assert_eq!(manipulator.image_result().format, PixelFormat::Rgb);
        assert_eq!(manipulator.image_result().pixels, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_stages_run_in_order() {
        let img = gradient(12, 12);
        let config = PipelineConfig::default();
        let params = EditParams {
            rotate: 90.0,
            zoom: 1.0,
            flip: Flip::X,
            brightness: 1.2,
            vibrance: 0.5,
            sepia: true,
            four_color: true,
            blur: 1.0,
            contrast: 1.0,
            balance: 1.5,
            hue: 10,
            effect: ArtisticEffect::Emboss,
            ..EditParams::default()
        };

        let mut manipulator = ImageManipulator::new(&img, &config);
        manipulator.apply_all(&params).unwrap();
        assert_eq!(
            manipulator.applied_stages(),
            &[
                "rotate",
                "zoom",
                "flip",
                "brightness",
                "vibrance",
                "sepia",
                "4-color",
                "blur",
                "contrast",
                "balance",
                "hue",
                "effect"
            ]
        );
        assert_eq!(manipulator.image_result().width, 10);
    }

    #[test]
    fn test_default_stages_are_skipped() {
        let img = gradient(4, 4);
        let config = PipelineConfig::default();
        let mut manipulator = ImageManipulator::new(&img, &config);
        manipulator.apply_all(&EditParams::default()).unwrap();
        assert!(manipulator.applied_stages().is_empty());
    }

    #[test]
    fn test_grayscale_then_invert() {
        let img = DecodedImage::new(1, 1, vec![255, 255, 255]);
        let params = EditParams {
            grayscale: true,
            invert: true,
            ..EditParams::default()
        };
        let result = render(&img, &params, &PipelineConfig::default()).unwrap();
        assert_eq!(result.format, PixelFormat::Luma);
        assert_eq!(result.pixels, vec![0]);
    }

    #[test]
    fn test_invert_rgba_is_unsupported() {
        let img = DecodedImage::with_format(1, 1, PixelFormat::Rgba, vec![1, 2, 3, 4]);
        let params = EditParams {
            invert: true,
            ..EditParams::default()
        };
        let err = render(&img, &params, &PipelineConfig::default()).unwrap_err();
        assert_eq!(
            err,
            StageError::UnsupportedOperation {
                stage: "invert",
                format: PixelFormat::Rgba
            }
        );
    }

    #[test]
    fn test_failed_stage_keeps_earlier_stages() {
        let img = DecodedImage::with_format(2, 1, PixelFormat::Rgba, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let config = PipelineConfig::default();
        let params = EditParams {
            flip: Flip::X,
            invert: true,
            ..EditParams::default()
        };
        let mut manipulator = ImageManipulator::new(&img, &config);
        assert!(manipulator.apply_all(&params).is_err());
        assert_eq!(manipulator.applied_stages(), &["flip"]);
        assert_eq!(manipulator.image_result().pixels, vec![5, 6, 7, 8, 1, 2, 3, 4]);
    }

    #[test]
    fn test_render_rejects_invalid_params() {
        let params = EditParams {
            blur: -2.0,
            ..EditParams::default()
        };
        let err = render(&gradient(2, 2), &params, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, StageError::InvalidParameters(_)));
    }

    #[test]
    fn test_balance_zero_is_skipped() {
        let img = gradient(5, 5);
        let config = PipelineConfig::default();
        let mut manipulator = ImageManipulator::new(&img, &config);
        manipulator.apply_balance(0.0);
        assert!(manipulator.applied_stages().is_empty());
        manipulator.apply_balance(1.0);
        assert_eq!(manipulator.image_result(), &img);
    }

    #[test]
    fn test_four_color_output_is_indexed_until_expanded() {
        let img = gradient(8, 8);
        let params = EditParams {
            four_color: true,
            ..EditParams::default()
        };
        let result = render(&img, &params, &PipelineConfig::default()).unwrap();
        assert_eq!(result.format, PixelFormat::Indexed);
        assert!(result.color_table.as_ref().unwrap().len() <= 4);

        let params = EditParams {
            four_color: true,
            blur: 1.0,
            ..EditParams::default()
        };
        let result = render(&img, &params, &PipelineConfig::default()).unwrap();
        assert_eq!(result.format, PixelFormat::Rgb);
    }

    #[test]
    fn test_session_update_and_revert() {
        let img = gradient(6, 6);
        let mut session = session(img.clone());
        assert_eq!(session.current(), &img);

        let params = EditParams {
            flip: Flip::Y,
            ..EditParams::default()
        };
        session.update(params.clone()).unwrap();
        assert_eq!(session.params(), &params);
        assert_ne!(session.current(), &img);
        assert_eq!(session.original(), &img);

        session.revert().unwrap();
        assert_eq!(session.current(), &img);
        assert!(session.params().is_default());
    }

    #[test]
    fn test_session_failure_keeps_displayed_image() {
        let img = DecodedImage::with_format(2, 2, PixelFormat::Rgba, vec![9; 16]);
        let mut session = session(img);
        session.set("brightness", ParamValue::Float(0.5)).unwrap();
        let before = session.current().clone();
        let params_before = session.params().clone();

        let err = session.set("invert", ParamValue::Bool(true)).unwrap_err();
        assert!(matches!(err, StageError::UnsupportedOperation { .. }));
        assert_eq!(session.current(), &before);
        assert_eq!(session.params(), &params_before);
    }

    #[test]
    fn test_session_set_rejects_bad_value() {
        let mut session = session(gradient(3, 3));
        let err = session.set("rotate", ParamValue::Float(400.0)).unwrap_err();
        assert!(matches!(err, StageError::InvalidParameters(_)));
    }

    #[test]
    fn test_session_revert_group() {
        let mut session = session(gradient(4, 4));
        session.set("sepia", ParamValue::Bool(true)).unwrap();
        session.set("blur", ParamValue::Float(1.0)).unwrap();
        session.revert_group(ParamGroup::Color).unwrap();
        assert!(!session.params().sepia);
        assert_eq!(session.params().blur, 1.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
