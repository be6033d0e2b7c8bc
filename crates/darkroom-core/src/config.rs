//! Pipeline configuration.
//!
//! The configuration is an immutable value handed to the pipeline driver at
//! construction. It can be loaded from TOML; missing keys take defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Resampling used by the Rotate stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationFilter {
    /// Nearest source pixel
    #[default]
    Nearest,
    /// Weighted average of the four surrounding pixels
    Bilinear,
}

/// Tunables of the image pipeline, export and palette extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Resampling for rotation
    pub rotation_filter: RotationFilter,

    /// Unsharp-mask strength of the Contrast stage, in percent
    pub unsharp_percent: u32,

    /// Minimum difference from the blurred value before a pixel is sharpened
    pub unsharp_threshold: u8,

    /// Palette size of the posterize stage
    pub posterize_colors: usize,

    /// Brightest tone of the sepia palette
    pub sepia_base: [u8; 3],

    /// JPEG quality of saved thumbnails
    pub thumbnail_quality: u8,

    /// Quality used when "keep" is requested but the source quality is unknown
    pub keep_quality_fallback: u8,

    /// Maximum number of palette swatches
    pub palette_limit: usize,

    /// Factor applied to swatch colors for their hover variant
    pub hover_scale: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rotation_filter: RotationFilter::Nearest,
            unsharp_percent: 150,
            unsharp_threshold: 3,
            posterize_colors: 4,
            sepia_base: [255, 240, 192],
            thumbnail_quality: 75,
            keep_quality_fallback: 90,
            palette_limit: 14,
            hover_scale: 0.5,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unsharp_percent == 0 {
            return Err(ConfigError::ValidationError(
                "unsharp_percent must be > 0".into(),
            ));
        }
        if !(1..=256).contains(&self.posterize_colors) {
            return Err(ConfigError::ValidationError(
                "posterize_colors must be between 1 and 256".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnail_quality) {
            return Err(ConfigError::ValidationError(
                "thumbnail_quality must be between 1 and 100".into(),
            ));
        }
        if !(1..=100).contains(&self.keep_quality_fallback) {
            return Err(ConfigError::ValidationError(
                "keep_quality_fallback must be between 1 and 100".into(),
            ));
        }
        if self.palette_limit == 0 {
            return Err(ConfigError::ValidationError(
                "palette_limit must be > 0".into(),
            ));
        }
        if !self.hover_scale.is_finite() || self.hover_scale < 0.0 {
            return Err(ConfigError::ValidationError(
                "hover_scale must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}
