//! Tunable physics parameters
//!
//! Every constant the integrator, boundary resolver and input controller use
//! lives in [`PhysicsConfig`]. Two presets cover the built-in widgets, and a
//! YAML file can override any subset of fields:
//!
//! ```yaml
//! gravity: 0.6
//! bounce: 0.5
//! size_range: { min: 40.0, max: 90.0 }
//! body_size: [64.0, 64.0]
//! ```
//!
//! Keys that are absent keep the value of the preset the file is applied to.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Inclusive range of body edge lengths used when spawning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Physics and gesture constants, all in pixels and frames
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsConfig {
    /// Added to `velocity.y` every frame
    pub gravity: f32,
    /// Multiplies both velocity components every frame
    pub friction: f32,
    /// Restitution on boundary contact
    pub bounce: f32,
    /// Extra damping of x velocity on floor contact
    pub floor_friction: f32,
    /// Spin retained per floor contact for a body of unit mass
    pub spin_damping: f32,
    /// Floor rebounds slower than this plus `gravity` settle to rest
    pub rest_speed: f32,
    pub kick_strength: f32,
    /// Half-width of the uniform jitter added to each kick axis
    pub kick_jitter: f32,
    /// How many frames the "kicked" flag stays raised
    pub kick_flash_frames: u32,
    /// Release velocity per pixel of the last pointer displacement
    pub throw_scale: f32,
    /// Pointer travel below which a press-release is a click
    pub click_slop: f32,
    /// Size of the mascot and of bodies spawned without a range
    pub body_size: Vec2,
    pub size_range: SizeRange,
    /// Upper bound of the random spawn velocity per axis
    pub spawn_speed: f32,
    /// Upper bound of the random spawn spin speed, radians per frame
    pub spawn_spin: f32,
}

impl PhysicsConfig {
    /// Constants for the single draggable mascot
    pub fn mascot() -> Self {
        Self {
            gravity: 0.8,
            friction: 0.98,
            bounce: 0.7,
            floor_friction: 0.95,
            spin_damping: 0.9,
            rest_speed: 1.0,
            kick_strength: 15.0,
            kick_jitter: 2.0,
            kick_flash_frames: 18,
            throw_scale: 0.0,
            click_slop: 4.0,
            body_size: Vec2::splat(60.0),
            size_range: SizeRange::new(60.0, 60.0),
            spawn_speed: 0.0,
            spawn_spin: 0.0,
        }
    }

    /// Constants for the playground of spinning shapes
    pub fn playground() -> Self {
        Self {
            gravity: 0.5,
            friction: 0.99,
            bounce: 0.6,
            floor_friction: 0.92,
            spin_damping: 0.85,
            rest_speed: 1.0,
            kick_strength: 12.0,
            kick_jitter: 1.5,
            kick_flash_frames: 18,
            throw_scale: 1.0,
            click_slop: 4.0,
            body_size: Vec2::splat(50.0),
            size_range: SizeRange::new(30.0, 80.0),
            spawn_speed: 4.0,
            spawn_spin: 0.1,
        }
    }

    /// Parse YAML overrides and apply them on top of `base`
    pub fn from_yaml_str(yaml: &str, base: &PhysicsConfig) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = serde_yaml::from_str(yaml)?;
        let config = overrides.apply(base.clone());
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file and apply it on top of `base`
    pub fn load(path: impl AsRef<Path>, base: &PhysicsConfig) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml, base)?;
        log::info!("Loaded physics config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would break containment or energy loss
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("gravity", self.gravity)?;
        unit_open_low("friction", self.friction)?;
        unit_open_low("floor_friction", self.floor_friction)?;
        if !(0.0..1.0).contains(&self.bounce) {
            return Err(invalid("bounce", format!("{} is outside [0, 1)", self.bounce)));
        }
        if !(0.0..=1.0).contains(&self.spin_damping) {
            return Err(invalid("spin_damping", format!("{} is outside [0, 1]", self.spin_damping)));
        }
        non_negative("rest_speed", self.rest_speed)?;
        non_negative("kick_strength", self.kick_strength)?;
        non_negative("kick_jitter", self.kick_jitter)?;
        non_negative("throw_scale", self.throw_scale)?;
        non_negative("click_slop", self.click_slop)?;
        non_negative("spawn_speed", self.spawn_speed)?;
        non_negative("spawn_spin", self.spawn_spin)?;

        if !(self.body_size.x > 0.0 && self.body_size.y > 0.0) || !self.body_size.is_finite() {
            return Err(invalid("body_size", format!("{:?} must be positive", self.body_size)));
        }
        let range = self.size_range;
        if !(range.min > 0.0 && range.min <= range.max && range.max.is_finite()) {
            return Err(invalid(
                "size_range",
                format!("[{}, {}] must satisfy 0 < min <= max", range.min, range.max),
            ));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::playground()
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be a finite value >= 0", value)))
    }
}

fn unit_open_low(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} is outside (0, 1]", value)))
    }
}

/// Partial config as written in a YAML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    gravity: Option<f32>,
    friction: Option<f32>,
    bounce: Option<f32>,
    floor_friction: Option<f32>,
    spin_damping: Option<f32>,
    rest_speed: Option<f32>,
    kick_strength: Option<f32>,
    kick_jitter: Option<f32>,
    kick_flash_frames: Option<u32>,
    throw_scale: Option<f32>,
    click_slop: Option<f32>,
    body_size: Option<Vec2>,
    size_range: Option<SizeRange>,
    spawn_speed: Option<f32>,
    spawn_spin: Option<f32>,
}

impl ConfigOverrides {
    fn apply(self, mut base: PhysicsConfig) -> PhysicsConfig {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field { base.$field = value; })*
            };
        }
        merge!(
            gravity,
            friction,
            bounce,
            floor_friction,
            spin_damping,
            rest_speed,
            kick_strength,
            kick_jitter,
            kick_flash_frames,
            throw_scale,
            click_slop,
            body_size,
            size_range,
            spawn_speed,
            spawn_spin,
        );
        base
    }
}
