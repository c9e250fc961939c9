//! Gameplay tuning
//!
//! Every balance constant in one serializable struct, so a round can be
//! replayed with a different feel without recompiling. Missing JSON fields
//! fall back to the defaults in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, read_json};

/// Physical parameters for pursuers at a given difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuerProfile {
    pub restitution: f32,
    pub density: f32,
    /// Per-step air friction
    pub air_friction: f32,
}

impl PursuerProfile {
    /// Pursuers get bouncier, heavier and less damped as levels advance
    pub fn for_level(level: u32) -> Self {
        let n = level as f32;
        Self {
            restitution: (0.4 + n * 0.02).min(0.95),
            density: (0.002 + n * 0.0003).min(0.015),
            air_friction: (0.04 - n * 0.0005).max(0.015),
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub wall_thickness: f32,
    /// Engine length scale, used to size internal solver tolerances
    pub pixels_per_meter: f32,

    // === Timing ===
    pub physics_hz: f32,
    pub max_substeps: u32,
    /// Protection duration in whole seconds
    pub protect_time: u32,

    // === Forces ===
    pub gravity: Vec2,
    pub pursuit_force: f32,
    pub pursuit_noise: f32,

    // === Ink ===
    pub max_ink: f32,
    pub min_step: f32,
    pub min_points: usize,
    pub min_ink_usage: f32,

    // === Protected zones ===
    pub forbidden_radius_spawn: f32,
    pub forbidden_radius_target: f32,

    // === Barrier ===
    pub barrier_thickness: f32,
    pub barrier_density: f32,
    pub barrier_restitution: f32,
    pub barrier_friction: f32,
    pub barrier_air_friction: f32,

    // === Target ===
    pub target_radius: f32,
    pub target_density: f32,
    pub target_restitution: f32,
    pub target_friction: f32,
    /// Per-step air friction
    pub target_air_friction: f32,

    // === Pursuers ===
    pub pursuer_radius: f32,
    pub pursuer_friction: f32,
    pub spawn_jitter: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            pixels_per_meter: 50.0,

            physics_hz: PHYSICS_HZ,
            max_substeps: MAX_SUBSTEPS,
            protect_time: PROTECT_TIME,

            gravity: Vec2::new(0.0, GRAVITY),
            pursuit_force: PURSUIT_FORCE,
            pursuit_noise: PURSUIT_NOISE,

            max_ink: MAX_INK,
            min_step: MIN_STEP,
            min_points: MIN_POINTS,
            min_ink_usage: MIN_INK_USAGE,

            forbidden_radius_spawn: FORBIDDEN_RADIUS_SPAWN,
            forbidden_radius_target: FORBIDDEN_RADIUS_TARGET,

            barrier_thickness: BARRIER_THICKNESS,
            barrier_density: BARRIER_DENSITY,
            barrier_restitution: BARRIER_RESTITUTION,
            barrier_friction: BARRIER_FRICTION,
            barrier_air_friction: BARRIER_AIR_FRICTION,

            target_radius: TARGET_RADIUS,
            target_density: TARGET_DENSITY,
            target_restitution: TARGET_RESTITUTION,
            target_friction: TARGET_FRICTION,
            target_air_friction: TARGET_AIR_FRICTION,

            pursuer_radius: PURSUER_RADIUS,
            pursuer_friction: PURSUER_FRICTION,
            spawn_jitter: SPAWN_JITTER,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Self::from_json(&read_json(path.as_ref())?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::Invalid("canvas dimensions must be positive"));
        }
        if self.physics_hz <= 0.0 {
            return Err(ConfigError::Invalid("physics_hz must be positive"));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1"));
        }
        if self.protect_time == 0 {
            return Err(ConfigError::Invalid("protect_time must be at least 1 second"));
        }
        if self.max_ink <= 0.0 {
            return Err(ConfigError::Invalid("max_ink must be positive"));
        }
        if self.min_points < 2 {
            return Err(ConfigError::Invalid("min_points must be at least 2"));
        }
        if self.min_ink_usage > self.max_ink {
            return Err(ConfigError::Invalid("min_ink_usage cannot exceed max_ink"));
        }
        if self.barrier_thickness <= 0.0 || self.barrier_density <= 0.0 {
            return Err(ConfigError::Invalid("barrier thickness and density must be positive"));
        }
        if self.forbidden_radius_spawn < 0.0 || self.forbidden_radius_target < 0.0 {
            return Err(ConfigError::Invalid("forbidden radii cannot be negative"));
        }
        if self.target_radius <= 0.0 || self.pursuer_radius <= 0.0 {
            return Err(ConfigError::Invalid("body radii must be positive"));
        }
        Ok(())
    }

    /// Fixed physics timestep (seconds)
    pub fn physics_dt(&self) -> f32 {
        1.0 / self.physics_hz
    }
}
