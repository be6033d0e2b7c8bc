//! Named access to the parameter set.
//!
//! The editing front end addresses parameters by the names of its controls
//! (`rotate`, `4-color`, ...). This module maps those names onto
//! [`EditParams`] fields and checks every value against its stage's domain.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::config::ConfigError;
use crate::{ArtisticEffect, EditParams, Flip};

/// Every parameter name, in pipeline order.
pub const PARAM_NAMES: [&str; 14] = [
    "rotate",
    "zoom",
    "flip",
    "brightness",
    "vibrance",
    "grayscale",
    "invert",
    "sepia",
    "4-color",
    "blur",
    "contrast",
    "balance",
    "hue",
    "effect",
];

/// Errors for out-of-domain or unknown parameter values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Parameter {name} expects {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("Parameter {name} = {value} is out of range, expected {expected}")]
    OutOfRange {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown option {value:?} for {name}")]
    UnknownOption { name: String, value: String },
}

/// A parameter value as supplied by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Choice(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Choice(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Float,
    Int,
    Bool,
    Choice,
}

fn kind_of(name: &str) -> Result<Kind, ParamError> {
    match name {
        "rotate" | "zoom" | "brightness" | "vibrance" | "blur" | "contrast" | "balance" => {
            Ok(Kind::Float)
        }
        "hue" => Ok(Kind::Int),
        "grayscale" | "invert" | "sepia" | "4-color" => Ok(Kind::Bool),
        "flip" | "effect" => Ok(Kind::Choice),
        _ => Err(ParamError::UnknownParameter(name.to_string())),
    }
}

impl ParamValue {
    /// Parse command-line text into the value type `name` expects.
    ///
    /// Booleans accept `true/false`, `yes/no`, `on/off` and `1/0`.
    pub fn parse_for(name: &str, text: &str) -> Result<ParamValue, ParamError> {
        let text = text.trim();
        let mismatch = |expected| ParamError::TypeMismatch {
            name: name.to_string(),
            expected,
        };

        match kind_of(name)? {
            Kind::Float => text
                .parse::<f64>()
                .map(ParamValue::Float)
                .map_err(|_| mismatch("a number")),
            Kind::Int => text
                .parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|_| mismatch("an integer")),
            Kind::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(ParamValue::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(ParamValue::Bool(false)),
                _ => Err(mismatch("a boolean")),
            },
            Kind::Choice => Ok(ParamValue::Choice(text.to_string())),
        }
    }
}

/// Control panels whose parameters revert together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamGroup {
    /// rotate, zoom, flip
    Position,
    /// brightness, vibrance, grayscale, invert, sepia, 4-color, hue
    Color,
    /// blur, contrast, balance, effect
    Effect,
}

impl ParamGroup {
    /// Parameter names belonging to this group.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            ParamGroup::Position => &["rotate", "zoom", "flip"],
            ParamGroup::Color => &[
                "brightness",
                "vibrance",
                "grayscale",
                "invert",
                "sepia",
                "4-color",
                "hue",
            ],
            ParamGroup::Effect => &["blur", "contrast", "balance", "effect"],
        }
    }
}

fn check_range(
    name: &str,
    value: f64,
    ok: bool,
    expected: &'static str,
) -> Result<(), ParamError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::OutOfRange {
            name: name.to_string(),
            value: value.to_string(),
            expected,
        })
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<(), ParamError> {
    check_range(name, value as f64, value >= 0.0, ">= 0")
}

impl EditParams {
    /// Set one parameter by its control name.
    ///
    /// The value is checked against the stage's domain; on error the
    /// parameter set is left unchanged.
    ///
    /// # Errors
    ///
    /// `UnknownParameter` for an unrecognized name, `TypeMismatch` when the
    /// value has the wrong type, `OutOfRange` / `UnknownOption` when it is
    /// outside the stage's domain.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let kind = kind_of(name)?;
        let mismatch = |expected| ParamError::TypeMismatch {
            name: name.to_string(),
            expected,
        };

        let mut next = self.clone();
        match kind {
            Kind::Float => {
                let v = match value {
                    ParamValue::Float(v) => v as f32,
                    ParamValue::Int(v) => v as f32,
                    _ => return Err(mismatch("a number")),
                };
                match name {
                    "rotate" => next.rotate = v,
                    "zoom" => next.zoom = v,
                    "brightness" => next.brightness = v,
                    "vibrance" => next.vibrance = v,
                    "blur" => next.blur = v,
                    "contrast" => next.contrast = v,
                    _ => next.balance = v,
                }
            }
            Kind::Int => {
                next.hue = match value {
                    ParamValue::Int(v) => i32::try_from(v).map_err(|_| ParamError::OutOfRange {
                        name: name.to_string(),
                        value: v.to_string(),
                        expected: "-100..=100",
                    })?,
                    _ => return Err(mismatch("an integer")),
                }
            }
            Kind::Bool => {
                let ParamValue::Bool(v) = value else {
                    return Err(mismatch("a boolean"));
                };
                match name {
                    "grayscale" => next.grayscale = v,
                    "invert" => next.invert = v,
                    "sepia" => next.sepia = v,
                    _ => next.four_color = v,
                }
            }
            Kind::Choice => {
                let ParamValue::Choice(text) = value else {
                    return Err(mismatch("an option name"));
                };
                if name == "flip" {
                    next.flip = text.parse::<Flip>()?;
                } else {
                    next.effect = text.parse::<ArtisticEffect>()?;
                }
            }
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Read one parameter by its control name.
    pub fn get(&self, name: &str) -> Result<ParamValue, ParamError> {
        Ok(match name {
            "rotate" => ParamValue::Float(self.rotate as f64),
            "zoom" => ParamValue::Float(self.zoom as f64),
            "flip" => ParamValue::Choice(self.flip.to_string()),
            "brightness" => ParamValue::Float(self.brightness as f64),
            "vibrance" => ParamValue::Float(self.vibrance as f64),
            "grayscale" => ParamValue::Bool(self.grayscale),
            "invert" => ParamValue::Bool(self.invert),
            "sepia" => ParamValue::Bool(self.sepia),
            "4-color" => ParamValue::Bool(self.four_color),
            "blur" => ParamValue::Float(self.blur as f64),
            "contrast" => ParamValue::Float(self.contrast as f64),
            "balance" => ParamValue::Float(self.balance as f64),
            "hue" => ParamValue::Int(self.hue as i64),
            "effect" => ParamValue::Choice(self.effect.to_string()),
            _ => return Err(ParamError::UnknownParameter(name.to_string())),
        })
    }

    /// Check every value against its stage's domain.
    pub fn validate(&self) -> Result<(), ParamError> {
        check_range(
            "rotate",
            self.rotate as f64,
            (0.0..360.0).contains(&self.rotate),
            "0 <= rotate < 360",
        )?;
        check_non_negative("zoom", self.zoom)?;
        check_non_negative("brightness", self.brightness)?;
        check_non_negative("vibrance", self.vibrance)?;
        check_non_negative("blur", self.blur)?;
        check_non_negative("contrast", self.contrast)?;
        check_non_negative("balance", self.balance)?;
        if !(-100..=100).contains(&self.hue) {
            return Err(ParamError::OutOfRange {
                name: "hue".to_string(),
                value: self.hue.to_string(),
                expected: "-100..=100",
            });
        }
        Ok(())
    }

    /// Parse and validate a parameter set from TOML text.
    ///
    /// Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let params: EditParams = toml::from_str(content)?;
        params
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        Ok(params)
    }

    /// Load a parameter set from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Restore the parameters of one control panel to their defaults.
    pub fn revert(&mut self, group: ParamGroup) {
        let defaults = EditParams::default();
        match group {
            ParamGroup::Position => {
                self.rotate = defaults.rotate;
                self.zoom = defaults.zoom;
                self.flip = defaults.flip;
            }
            ParamGroup::Color => {
                self.brightness = defaults.brightness;
                self.vibrance = defaults.vibrance;
                self.grayscale = defaults.grayscale;
                self.invert = defaults.invert;
                self.sepia = defaults.sepia;
                self.four_color = defaults.four_color;
                self.hue = defaults.hue;
            }
            ParamGroup::Effect => {
                self.blur = defaults.blur;
                self.contrast = defaults.contrast;
                self.balance = defaults.balance;
                self.effect = defaults.effect;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str_validates() {
        let params = EditParams::from_toml_str("blur = 1.5\nsepia = true\n").unwrap();
        assert_eq!(params.blur, 1.5);
        assert!(params.sepia);

        let err = EditParams::from_toml_str("rotate = 360.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(matches!(
            EditParams::from_toml_str("hue = \"red\"\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edit.toml");
        std::fs::write(&path, "flip = \"X\"\n\"4-color\" = true\n").unwrap();
        let params = EditParams::load(&path).unwrap();
        assert_eq!(params.flip, Flip::X);
        assert!(params.four_color);

        let missing = EditParams::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_set_each_kind() {
        let mut params = EditParams::new();
        params.set("rotate", ParamValue::Float(45.0)).unwrap();
        params.set("blur", ParamValue::Int(2)).unwrap();
        params.set("4-color", ParamValue::Bool(true)).unwrap();
        params.set("hue", ParamValue::Int(-30)).unwrap();
        params
            .set("effect", ParamValue::Choice("Contour".to_string()))
            .unwrap();

        assert_eq!(params.rotate, 45.0);
        assert_eq!(params.blur, 2.0);
        assert!(params.four_color);
        assert_eq!(params.hue, -30);
        assert_eq!(params.effect, ArtisticEffect::Contour);
    }

    #[test]
    fn test_set_unknown_name() {
        let mut params = EditParams::new();
        let err = params.set("saturation", ParamValue::Float(1.0)).unwrap_err();
        assert_eq!(err, ParamError::UnknownParameter("saturation".to_string()));
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut params = EditParams::new();
        assert!(matches!(
            params.set("sepia", ParamValue::Float(1.0)),
            Err(ParamError::TypeMismatch { .. })
        ));
        assert!(matches!(
            params.set("hue", ParamValue::Float(1.5)),
            Err(ParamError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_set_out_of_range_leaves_params_unchanged() {
        let mut params = EditParams::new();
        params.set("rotate", ParamValue::Float(90.0)).unwrap();

        let err = params.set("rotate", ParamValue::Float(360.0)).unwrap_err();
        assert!(matches!(err, ParamError::OutOfRange { .. }));
        assert_eq!(params.rotate, 90.0);

        assert!(params.set("blur", ParamValue::Float(-1.0)).is_err());
        assert!(params.set("hue", ParamValue::Int(101)).is_err());
        assert!(params.set("hue", ParamValue::Int(i64::MAX)).is_err());
        assert_eq!(params.blur, 0.0);
        assert_eq!(params.hue, 0);
    }

    #[test]
    fn test_set_unknown_option() {
        let mut params = EditParams::new();
        let err = params
            .set("flip", ParamValue::Choice("Diagonal".to_string()))
            .unwrap_err();
        assert!(matches!(err, ParamError::UnknownOption { .. }));
    }

    #[test]
    fn test_get_mirrors_set() {
        let mut params = EditParams::new();
        params.set("flip", ParamValue::Choice("Y".to_string())).unwrap();
        assert_eq!(params.get("flip").unwrap(), ParamValue::Choice("Y".to_string()));
        assert_eq!(params.get("vibrance").unwrap(), ParamValue::Float(1.0));
        for name in PARAM_NAMES {
            assert!(params.get(name).is_ok(), "{}", name);
        }
        assert!(params.get("nope").is_err());
    }

    #[test]
    fn test_parse_for() {
        assert_eq!(
            ParamValue::parse_for("brightness", "1.5").unwrap(),
            ParamValue::Float(1.5)
        );
        assert_eq!(ParamValue::parse_for("hue", "-20").unwrap(), ParamValue::Int(-20));
        assert_eq!(ParamValue::parse_for("invert", "yes").unwrap(), ParamValue::Bool(true));
        assert_eq!(ParamValue::parse_for("sepia", "0").unwrap(), ParamValue::Bool(false));
        assert_eq!(
            ParamValue::parse_for("effect", "Find edges").unwrap(),
            ParamValue::Choice("Find edges".to_string())
        );
        assert!(matches!(
            ParamValue::parse_for("zoom", "wide"),
            Err(ParamError::TypeMismatch { .. })
        ));
        assert!(matches!(
            ParamValue::parse_for("hue", "2.5"),
            Err(ParamError::TypeMismatch { .. })
        ));
        assert!(matches!(
            ParamValue::parse_for("gamma", "1"),
            Err(ParamError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let params = EditParams {
            brightness: f32::NAN,
            ..EditParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_default() {
        assert!(EditParams::default().validate().is_ok());
    }

    #[test]
    fn test_revert_group() {
        let mut params = EditParams::new();
        params.rotate = 10.0;
        params.flip = Flip::X;
        params.sepia = true;
        params.hue = 40;
        params.blur = 3.0;
        params.effect = ArtisticEffect::Emboss;

        params.revert(ParamGroup::Color);
        assert!(!params.sepia);
        assert_eq!(params.hue, 0);
        assert_eq!(params.rotate, 10.0);

        params.revert(ParamGroup::Position);
        assert_eq!(params.rotate, 0.0);
        assert_eq!(params.flip, Flip::None);
        assert_eq!(params.blur, 3.0);

        params.revert(ParamGroup::Effect);
        assert!(params.is_default());
    }

    #[test]
    fn test_groups_cover_every_name() {
        let mut names: Vec<&str> = [ParamGroup::Position, ParamGroup::Color, ParamGroup::Effect]
            .iter()
            .flat_map(|g| g.names().iter().copied())
            .collect();
        names.sort_unstable();
        let mut all = PARAM_NAMES.to_vec();
        all.sort_unstable();
        assert_eq!(names, all);
    }
}
