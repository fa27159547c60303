//! Tunable simulation parameters, shared by the panel, the blobs and the
//! renderer.

use crate::math::Color;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Slider range for the repulsion force.
pub const REPULSION_FORCE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Slider range for the spring stiffness.
pub const SPRING_STIFFNESS_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Slider range for the pointer interaction radius.
pub const MOUSE_RADIUS_RANGE: RangeInclusive<f32> = 0.5..=3.0;
/// Slider range for the size of newly created blobs.
pub const BLOB_SIZE_RANGE: RangeInclusive<f32> = 0.3..=2.5;

/// Tunable parameters. Pure data; blob lifecycle actions live on the
/// registry. Edits take effect on the next frame, and `blob_size` only
/// affects blobs created afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Strength of the pointer-proximity force applied to nearby vertices.
    pub repulsion_force: f32,

    /// Stiffness of the per-vertex spring pulling toward the rest shape.
    pub spring_stiffness: f32,

    /// Radius around the pointer's world-space point inside which vertices
    /// are affected.
    pub mouse_radius: f32,

    /// Radius of newly created blobs.
    pub blob_size: f32,

    /// Bottom color of the vertical blend.
    #[serde(with = "hex_color")]
    pub color1: Color,

    /// Top color of the vertical blend.
    #[serde(with = "hex_color")]
    pub color2: Color,

    /// Window clear color.
    #[serde(default = "default_background", with = "hex_color")]
    pub background: Color,
}

fn default_background() -> Color {
    Color::from_hex(0x10101a)
}

impl Default for Params {
    fn default() -> Self {
        Self {
            repulsion_force: 0.8,
            spring_stiffness: 0.4,
            mouse_radius: 1.5,
            blob_size: 1.0,
            color1: Color::from_hex(0xff3366),
            color2: Color::from_hex(0x3366ff),
            background: default_background(),
        }
    }
}

impl Params {
    /// Load parameters from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut params: Params = serde_json::from_str(&contents)?;
        params.clamp();
        Ok(params)
    }

    /// Save parameters to a JSON file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Clamp all values into their panel ranges.
    pub fn clamp(&mut self) {
        self.repulsion_force = self
            .repulsion_force
            .clamp(*REPULSION_FORCE_RANGE.start(), *REPULSION_FORCE_RANGE.end());
        self.spring_stiffness = self
            .spring_stiffness
            .clamp(*SPRING_STIFFNESS_RANGE.start(), *SPRING_STIFFNESS_RANGE.end());
        self.mouse_radius = self
            .mouse_radius
            .clamp(*MOUSE_RADIUS_RANGE.start(), *MOUSE_RADIUS_RANGE.end());
        self.blob_size = self
            .blob_size
            .clamp(*BLOB_SIZE_RANGE.start(), *BLOB_SIZE_RANGE.end());
    }

    /// True if every numeric field holds a finite value. A store that fails
    /// this check must not drive a physics update.
    pub fn is_finite(&self) -> bool {
        self.repulsion_force.is_finite()
            && self.spring_stiffness.is_finite()
            && self.mouse_radius.is_finite()
            && self.blob_size.is_finite()
    }
}

/// Shared handle to the parameter store. The app is single-threaded, so a
/// reference-counted cell is all the sharing discipline needed: blobs and the
/// renderer read through it, the panel writes through it.
pub type SharedParams = Rc<RefCell<Params>>;

/// Create a shared handle around a parameter set.
pub fn shared(params: Params) -> SharedParams {
    Rc::new(RefCell::new(params))
}

/// Errors from loading or saving a parameter file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents could not be parsed or encoded.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

mod hex_color {
    use crate::math::Color;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.to_hex_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex_str(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}
