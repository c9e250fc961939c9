//! Barrier construction
//!
//! A drawn path becomes one dynamic rigid body made of thin rectangles,
//! one per consecutive point pair. The rectangles are colliders on a
//! single body, so the line moves as a stiff assembly rather than a chain.

use glam::Vec2;
use rapier2d::prelude::{ColliderBuilder, Isometry, RigidBodyBuilder, RigidBodyHandle};
use serde::{Deserialize, Serialize};

use super::categories::BodyKind;
use super::world::PhysicsWorld;
use crate::error::BuildError;
use crate::settings::Tuning;
use crate::to_vector;

/// One rectangle of a barrier, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrierSegment {
    pub center: Vec2,
    /// Direction of the segment (radians)
    pub angle: f32,
    pub length: f32,
    pub thickness: f32,
}

/// Barrier geometry before it enters the physics world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrierShape {
    pub segments: Vec<BarrierSegment>,
}

impl BarrierShape {
    /// Build segment geometry from a path
    ///
    /// Zero-length pairs are skipped. Fails when fewer than two distinct
    /// points remain.
    pub fn from_path(points: &[Vec2], thickness: f32) -> Result<Self, BuildError> {
        if points.len() < 2 {
            return Err(BuildError::InsufficientPath {
                points: points.len(),
            });
        }

        let mut segments = Vec::with_capacity(points.len() - 1);
        for pair in points.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            let delta = p2 - p1;
            let length = delta.length();
            if length <= f32::EPSILON {
                log::trace!("skipping degenerate barrier segment at {p1}");
                continue;
            }
            segments.push(BarrierSegment {
                center: (p1 + p2) / 2.0,
                angle: delta.y.atan2(delta.x),
                length,
                thickness,
            });
        }

        if segments.is_empty() {
            return Err(BuildError::InsufficientPath { points: 1 });
        }
        Ok(Self { segments })
    }

    /// Length-weighted centroid of the segment centers
    pub fn centroid(&self) -> Vec2 {
        let total: f32 = self.segments.iter().map(|s| s.length).sum();
        let weighted: Vec2 = self.segments.iter().map(|s| s.center * s.length).sum();
        weighted / total
    }

    /// Total area, for mass estimates
    pub fn area(&self) -> f32 {
        self.segments.iter().map(|s| s.length * s.thickness).sum()
    }
}

/// Turn a drawn path into a barrier body in `world`
///
/// This is the only place gameplay code adds a barrier to the world.
pub fn build_barrier(
    world: &mut PhysicsWorld,
    points: &[Vec2],
    tuning: &Tuning,
) -> Result<RigidBodyHandle, BuildError> {
    let shape = BarrierShape::from_path(points, tuning.barrier_thickness)?;
    let kind = BodyKind::BarrierSegment;
    let origin = shape.centroid();

    let damping = world.damping_for(tuning.barrier_air_friction);
    let body = RigidBodyBuilder::dynamic()
        .translation(to_vector(origin))
        .linear_damping(damping)
        .angular_damping(damping)
        .user_data(kind.to_user_data())
        .build();
    let handle = world.bodies.insert(body);

    for segment in &shape.segments {
        let local = Isometry::new(to_vector(segment.center - origin), segment.angle);
        let collider = ColliderBuilder::cuboid(segment.length / 2.0, segment.thickness / 2.0)
            .position(local)
            .density(tuning.barrier_density)
            .restitution(tuning.barrier_restitution)
            .friction(tuning.barrier_friction)
            .collision_groups(kind.interaction_groups())
            .user_data(kind.to_user_data())
            .build();
        world
            .colliders
            .insert_with_parent(collider, handle, &mut world.bodies);
    }

    world.bodies[handle].recompute_mass_properties_from_colliders(&world.colliders);
    world.registry.barriers.push(handle);
    log::info!(
        "barrier built: {} segments, area {:.0}",
        shape.segments.len(),
        shape.area()
    );
    Ok(handle)
}
