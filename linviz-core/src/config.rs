//! TOML configuration for grid size, animation pacing and the starting camera pose.
//!
//! Every section and field is optional; anything missing takes its default.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::animation::DEFAULT_SPEED;
use crate::camera::{
    OrbitCamera, DEFAULT_AZIMUTH_DEG, DEFAULT_DISTANCE, DEFAULT_POLAR_DEG, MAX_DISTANCE,
    MIN_DISTANCE, POLAR_LIMIT_DEG,
};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub extent: u32,
    pub spacing: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            extent: 8,
            spacing: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Progress added per tick
    pub speed: f64,
    pub tick_rate_hz: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            tick_rate_hz: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f64,
    pub polar_deg: f64,
    pub azimuth_deg: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            polar_deg: DEFAULT_POLAR_DEG,
            azimuth_deg: DEFAULT_AZIMUTH_DEG,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> OrbitCamera {
        OrbitCamera::new(self.distance, self.polar_deg, self.azimuth_deg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub grid: GridConfig,
    pub animation: AnimationConfig,
    pub camera: CameraConfig,
}

/// Load config from a TOML file.
///
/// A file that parses but fails validation is logged and replaced by the
/// defaults.
pub fn load_from_path(path: &Path) -> Result<VisualizerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
    let config = parse_str(&content)?;

    if let Err(e) = validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(VisualizerConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_str(content: &str) -> Result<VisualizerConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(format!("failed to parse TOML: {e}")))
}

/// Check every numeric range, collecting all failures into one error
pub fn validate(config: &VisualizerConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "grid.extent", config.grid.extent, 1, 50);
    validate_range(&mut errors, "grid.spacing", config.grid.spacing, 1, config.grid.extent.max(1));
    validate_range(&mut errors, "animation.tick_rate_hz", config.animation.tick_rate_hz, 1, 240);
    validate_range_f64(&mut errors, "camera.distance", config.camera.distance, MIN_DISTANCE, MAX_DISTANCE);
    validate_range_f64(
        &mut errors,
        "camera.polar_deg",
        config.camera.polar_deg,
        -POLAR_LIMIT_DEG,
        POLAR_LIMIT_DEG,
    );

    let speed = config.animation.speed;
    if !(speed > 0.0 && speed <= 1.0) {
        errors.push(format!("animation.speed must be in (0, 1], got {speed}"));
    }
    if !config.camera.azimuth_deg.is_finite() {
        errors.push("camera.azimuth_deg must be finite".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}

fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}
