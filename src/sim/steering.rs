//! Pursuit steering
//!
//! Each tick every pursuer is pushed toward the target with a force scaled
//! by its own mass, so light and heavy pursuers accelerate alike. A little
//! per-axis noise is added to the unit direction before scaling; the sum is
//! deliberately not renormalised, which lets the effective force drift
//! slightly around the nominal magnitude.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::world::PhysicsWorld;
use crate::settings::Tuning;
use crate::to_vector;

/// Source of per-axis steering noise
pub trait SteeringNoise {
    /// Offset added to the unit direction, each axis within ±amplitude/2
    fn sample(&mut self, amplitude: f32) -> Vec2;
}

/// Seeded noise, uniform on each axis
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: Pcg32,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl SteeringNoise for SeededNoise {
    fn sample(&mut self, amplitude: f32) -> Vec2 {
        let x: f32 = self.rng.random_range(-0.5..0.5);
        let y: f32 = self.rng.random_range(-0.5..0.5);
        Vec2::new(x, y) * amplitude
    }
}

/// No noise at all; pursuers fly straight
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl SteeringNoise for NoNoise {
    fn sample(&mut self, _amplitude: f32) -> Vec2 {
        Vec2::ZERO
    }
}

/// Force on one pursuer, or `None` when it sits exactly on the target
pub fn pursuit_force(
    pursuer: Vec2,
    target: Vec2,
    mass: f32,
    strength: f32,
    noise: Vec2,
) -> Option<Vec2> {
    let delta = target - pursuer;
    let distance = delta.length();
    if distance == 0.0 {
        return None;
    }
    Some((delta / distance + noise) * (strength * mass))
}

/// Replace every pursuer's applied force with a fresh pursuit force
///
/// Does nothing when the world has no target.
pub fn apply_pursuit(world: &mut PhysicsWorld, noise: &mut dyn SteeringNoise, tuning: &Tuning) {
    let Some(target) = world.target_position() else {
        return;
    };

    for &handle in &world.registry.pursuers {
        let Some(body) = world.bodies.get_mut(handle) else {
            continue;
        };
        body.reset_forces(false);

        let pos = Vec2::new(body.translation().x, body.translation().y);
        let offset = noise.sample(tuning.pursuit_noise);
        if let Some(force) = pursuit_force(pos, target, body.mass(), tuning.pursuit_force, offset) {
            body.add_force(to_vector(force), true);
        }
    }
}
