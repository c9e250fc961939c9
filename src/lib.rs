//! Ink Barrier - a draw-to-defend physics game core
//!
//! Core modules:
//! - `sim`: Round simulation (barrier drawing, pursuit steering, rigid-body world)
//! - `settings`: Data-driven gameplay tuning
//! - `error`: Error types shared across the crate

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{BuildError, ConfigError};
pub use settings::Tuning;

use glam::Vec2;
use rapier2d::prelude::{Real, Vector};

/// Game configuration constants
pub mod consts {
    /// Simulation canvas size (pixels)
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 700.0;

    /// Physics rate; air friction values are expressed per step at this rate
    pub const PHYSICS_HZ: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame fed to the physics accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward gravity (pixels/s²)
    pub const GRAVITY: f32 = 1000.0;

    /// Seconds the target must survive once pursuers are released
    pub const PROTECT_TIME: u32 = 10;

    /// Pursuit acceleration (force per unit mass, pixels/s²)
    pub const PURSUIT_FORCE: f32 = 2800.0;
    /// Full width of the uniform per-axis steering noise
    pub const PURSUIT_NOISE: f32 = 0.2;

    /// Ink budget
    pub const MAX_INK: f32 = 500.0;
    /// Pointer moves shorter than this are not recorded
    pub const MIN_STEP: f32 = 12.0;
    /// Gestures with fewer points are treated as accidental taps
    pub const MIN_POINTS: usize = 5;
    /// Gestures consuming less ink are treated as accidental drags
    pub const MIN_INK_USAGE: f32 = 40.0;

    /// Protected zone radii
    pub const FORBIDDEN_RADIUS_SPAWN: f32 = 70.0;
    pub const FORBIDDEN_RADIUS_TARGET: f32 = 50.0;

    /// Barrier segment defaults
    pub const BARRIER_THICKNESS: f32 = 14.0;
    pub const BARRIER_DENSITY: f32 = 0.008;
    pub const BARRIER_RESTITUTION: f32 = 0.1;
    pub const BARRIER_FRICTION: f32 = 0.1;
    pub const BARRIER_AIR_FRICTION: f32 = 0.03;

    /// Target defaults
    pub const TARGET_RADIUS: f32 = 30.0;
    pub const TARGET_DENSITY: f32 = 0.01;
    pub const TARGET_RESTITUTION: f32 = 0.4;
    pub const TARGET_FRICTION: f32 = 0.05;
    pub const TARGET_AIR_FRICTION: f32 = 0.01;

    /// Pursuer defaults
    pub const PURSUER_RADIUS: f32 = 9.0;
    pub const PURSUER_FRICTION: f32 = 0.1;
    /// Full width of the square around a spawn zone where pursuers appear
    pub const SPAWN_JITTER: f32 = 40.0;

    /// Boundary wall thickness (walls sit just outside the canvas)
    pub const WALL_THICKNESS: f32 = 50.0;
}

/// Convert a glam vector to a physics-engine vector
#[inline]
pub fn to_vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

/// Convert a physics-engine vector to glam
#[inline]
pub fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Convert a per-step air friction coefficient to continuous linear damping
#[inline]
pub fn air_friction_to_damping(air_friction: f32, steps_per_second: f32) -> f32 {
    air_friction * steps_per_second
}
