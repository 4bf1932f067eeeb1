//! TOML-backed engine configuration.
//!
//! Every section falls back to its defaults when absent, so an empty file (or
//! no file at all) yields the stock tuning.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "boxwalk.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "boxwalk".to_string(), width: 1280, height: 720 }
    }
}

/// Player velocity tuning, in units and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Horizontal speed cap, ground and air.
    pub move_speed: f32,
    /// Vertical acceleration; negative pulls down.
    pub gravity: f32,
    pub jump_speed: f32,
    pub ground_accel: f32,
    pub ground_decel: f32,
    pub air_accel: f32,
    /// Multiplier on `air_accel`.
    pub air_control: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            gravity: -25.0,
            jump_speed: 10.0,
            ground_accel: 40.0,
            ground_decel: 80.0,
            air_accel: 10.0,
            air_control: 0.6,
        }
    }
}

/// Distances used by collision resolution and the ground probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// How far the player's bottom may sit below a box top and still count as standing on it.
    pub floor_epsilon: f32,
    pub ground_probe_distance: f32,
    pub ground_epsilon: f32,
    /// Deepest sinking the ground probe will push the player back out of.
    pub max_penetration: f32,
    /// Ground ray origin height above the bottom of the player's box.
    pub probe_lift: f32,
    /// Gap left between the player and a blocker after a blocked move.
    pub contact_skin: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            floor_epsilon: 0.05,
            ground_probe_distance: 0.15,
            ground_epsilon: 0.08,
            max_penetration: 0.20,
            probe_lift: 0.01,
            contact_skin: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    pub mouse_sensitivity: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self { mouse_sensitivity: 0.15 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Eye position relative to the owner's origin.
    pub eye_offset: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { fov_y_degrees: 60.0, znear: 0.05, zfar: 200.0, eye_offset: [0.0, 0.8, 0.0] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Also the fog colour.
    pub clear_color: [f32; 4],
    pub fog_start: f32,
    pub fog_end: f32,
    pub light_direction: [f32; 3],
    pub light_intensity: f32,
    pub ambient: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.55, 0.65, 0.78, 1.0],
            fog_start: 15.0,
            fog_end: 60.0,
            light_direction: [-0.3, -1.0, -0.2],
            light_intensity: 0.75,
            ambient: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest frame step the simulation will take, in seconds.
    pub max_frame_dt: f32,
    pub window: WindowConfig,
    pub movement: MovementTuning,
    pub collision: CollisionTuning,
    pub look: LookConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,
            window: WindowConfig::default(),
            movement: MovementTuning::default(),
            collision: CollisionTuning::default(),
            look: LookConfig::default(),
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }

    /// Never fails: a missing file is normal, anything else is logged and ignored.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) if e.is_not_found() => {
                info!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be a finite value >= 0, got {value}")))
            }
        }

        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(ConfigError::invalid("max_frame_dt", "must be > 0"));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid("window", "width and height must be non-zero"));
        }

        let m = &self.movement;
        if !(m.move_speed.is_finite() && m.move_speed > 0.0) {
            return Err(ConfigError::invalid("movement.move_speed", "must be > 0"));
        }
        if !(m.gravity.is_finite() && m.gravity <= 0.0) {
            return Err(ConfigError::invalid("movement.gravity", "must be <= 0 (negative pulls down)"));
        }
        non_negative("movement.jump_speed", m.jump_speed)?;
        non_negative("movement.ground_accel", m.ground_accel)?;
        non_negative("movement.ground_decel", m.ground_decel)?;
        non_negative("movement.air_accel", m.air_accel)?;
        non_negative("movement.air_control", m.air_control)?;

        let c = &self.collision;
        non_negative("collision.floor_epsilon", c.floor_epsilon)?;
        non_negative("collision.ground_probe_distance", c.ground_probe_distance)?;
        non_negative("collision.ground_epsilon", c.ground_epsilon)?;
        non_negative("collision.max_penetration", c.max_penetration)?;
        non_negative("collision.probe_lift", c.probe_lift)?;
        non_negative("collision.contact_skin", c.contact_skin)?;

        if !self.look.mouse_sensitivity.is_finite() {
            return Err(ConfigError::invalid("look.mouse_sensitivity", "must be finite"));
        }

        let cam = &self.camera;
        if !(cam.znear > 0.0 && cam.zfar > cam.znear) {
            return Err(ConfigError::invalid("camera", "need 0 < znear < zfar"));
        }
        if !(cam.fov_y_degrees > 0.0 && cam.fov_y_degrees < 180.0) {
            return Err(ConfigError::invalid("camera.fov_y_degrees", "must be in (0, 180)"));
        }
        if self.render.fog_end <= self.render.fog_start {
            return Err(ConfigError::invalid("render.fog_end", "must be greater than fog_start"));
        }
        Ok(())
    }
}
