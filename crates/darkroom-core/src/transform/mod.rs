//! Geometry stages: rotation, zoom (border crop) and flip.
//!
//! These run first in the editing pipeline, before any color work.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Crop coordinates are in pixels
//! - Origin is top-left corner

mod crop;
mod flip;
mod rotation;

pub use crop::{apply_crop, apply_zoom};
pub use flip::apply_flip;
pub use rotation::apply_rotation;
