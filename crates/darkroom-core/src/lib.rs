//! Darkroom Core - non-destructive image editing pipeline
//!
//! This crate provides the image manipulation core of Darkroom: an ordered
//! set of stages (geometry, color, filters) re-applied from the untouched
//! original on every parameter change, plus import, export, metadata and
//! palette extraction around it.

pub mod adjustments;
pub mod color;
pub mod config;
pub mod decode;
pub mod encode;
pub mod filters;
pub mod histogram;
pub mod lut;
pub mod luminance;
pub mod manipulator;
pub mod metadata;
pub mod palette;
pub mod params;
pub mod quantize;
pub mod transform;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, PipelineConfig};
pub use decode::{open_image, DecodedImage, ImportedImage, PixelFormat, SourceInfo};
pub use manipulator::{render, EditSession, ImageManipulator, StageError};
pub use params::{ParamError, ParamGroup, ParamValue};

/// Crate version, for log banners.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Mirror/flip mode of the Flip stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Flip {
    /// No flipping
    #[default]
    None,
    /// Mirror left-right
    X,
    /// Flip top-bottom
    Y,
    /// Both directions
    Both,
}

impl Flip {
    /// All options in display order.
    pub const ALL: [Flip; 4] = [Flip::None, Flip::X, Flip::Y, Flip::Both];

    /// Whether this mode mirrors left-right.
    pub fn mirrors(self) -> bool {
        matches!(self, Flip::X | Flip::Both)
    }

    /// Whether this mode flips top-bottom.
    pub fn flips(self) -> bool {
        matches!(self, Flip::Y | Flip::Both)
    }

    /// User-facing option name.
    pub fn name(self) -> &'static str {
        match self {
            Flip::None => "None",
            Flip::X => "X",
            Flip::Y => "Y",
            Flip::Both => "Both",
        }
    }
}

impl fmt::Display for Flip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flip {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flip::ALL
            .into_iter()
            .find(|flip| flip.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParamError::UnknownOption {
                name: "flip".to_string(),
                value: s.to_string(),
            })
    }
}

/// Fixed-kernel artistic filter applied as the last stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum ArtisticEffect {
    /// No effect
    #[default]
    None,
    /// Relief shading against mid gray
    Emboss,
    /// Edge detection on black
    #[serde(rename = "Find edges")]
    FindEdges,
    /// Dark edge lines on white
    Contour,
    /// Mild edge sharpening
    #[serde(rename = "Edge enhance")]
    EdgeEnhance,
}

impl ArtisticEffect {
    /// All options in display order.
    pub const ALL: [ArtisticEffect; 5] = [
        ArtisticEffect::None,
        ArtisticEffect::Emboss,
        ArtisticEffect::FindEdges,
        ArtisticEffect::Contour,
        ArtisticEffect::EdgeEnhance,
    ];

    /// User-facing option name.
    pub fn name(self) -> &'static str {
        match self {
            ArtisticEffect::None => "None",
            ArtisticEffect::Emboss => "Emboss",
            ArtisticEffect::FindEdges => "Find edges",
            ArtisticEffect::Contour => "Contour",
            ArtisticEffect::EdgeEnhance => "Edge enhance",
        }
    }
}

impl fmt::Display for ArtisticEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArtisticEffect {
    type Err = ParamError;

    /// Accepts the display names case-insensitively, with `-` or `_` in
    /// place of the space ("find-edges").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        ArtisticEffect::ALL
            .into_iter()
            .find(|effect| effect.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ParamError::UnknownOption {
                name: "effect".to_string(),
                value: s.to_string(),
            })
    }
}

/// The full parameter set of one edit, one value per stage.
///
/// `Default` gives the identity value of every stage, so a default set
/// renders the original unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditParams {
    /// Counter-clockwise rotation in degrees, [0, 360)
    pub rotate: f32,
    /// Pixels cropped from every edge, >= 0
    pub zoom: f32,
    /// Mirror / flip mode
    pub flip: Flip,
    /// Brightness factor (0 = black, 1 = unchanged)
    pub brightness: f32,
    /// Saturation factor (0 = gray, 1 = unchanged)
    pub vibrance: f32,
    /// Convert to a single luma channel
    pub grayscale: bool,
    /// Negative
    pub invert: bool,
    /// Warm monochrome tone
    pub sepia: bool,
    /// Posterize to four representative colors
    #[serde(rename = "4-color")]
    pub four_color: bool,
    /// Gaussian blur standard deviation, >= 0
    pub blur: f32,
    /// Unsharp-mask radius, >= 0
    pub contrast: f32,
    /// Color balance enhancement factor; 0 means untouched
    pub balance: f32,
    /// Hue rotation in degrees, [-100, 100]
    pub hue: i32,
    /// Artistic kernel filter
    pub effect: ArtisticEffect,
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            rotate: 0.0,
            zoom: 0.0,
            flip: Flip::None,
            brightness: 1.0,
            vibrance: 1.0,
            grayscale: false,
            invert: false,
            sepia: false,
            four_color: false,
            blur: 0.0,
            contrast: 0.0,
            balance: 0.0,
            hue: 0,
            effect: ArtisticEffect::None,
        }
    }
}

impl EditParams {
    /// Create a parameter set with every stage at its identity value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Restore every parameter to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
