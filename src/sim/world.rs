//! Physics world
//!
//! Owns the rigid-body engine state for one round plus a registry of the
//! handles the game logic cares about, so per-tick code never scans bodies
//! by tag. Contact notifications are buffered during a step and handed back
//! from [`PhysicsWorld::step`] as a plain list.

use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use super::categories::BodyKind;
use super::geometry::Rect;
use crate::settings::{PursuerProfile, Tuning};
use crate::{air_friction_to_damping, from_vector, to_vector};

/// A contact that started during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kinds: (BodyKind, BodyKind),
    pub bodies: (Option<RigidBodyHandle>, Option<RigidBodyHandle>),
}

impl Contact {
    /// True only for a target/pursuer pair
    pub fn is_target_strike(&self) -> bool {
        matches!(
            self.kinds,
            (BodyKind::Target, BodyKind::Pursuer) | (BodyKind::Pursuer, BodyKind::Target)
        )
    }
}

/// Buffers collision events raised inside the physics pipeline
#[derive(Default)]
struct ContactBuffer {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl ContactBuffer {
    fn drain(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        self.started
            .lock()
            .map(|mut started| std::mem::take(&mut *started))
            .unwrap_or_default()
    }
}

impl EventHandler for ContactBuffer {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(h1, h2, _) = event {
            if let Ok(mut started) = self.started.lock() {
                started.push((h1, h2));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Direct handles to the bodies game logic reads every tick
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    pub target: Option<RigidBodyHandle>,
    pub pursuers: Vec<RigidBodyHandle>,
    pub barriers: Vec<RigidBodyHandle>,
    pub statics: Vec<(RigidBodyHandle, BodyKind)>,
}

/// The rigid-body world for one round
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub registry: BodyRegistry,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    contacts: ContactBuffer,
    /// Steps per second, used to convert per-step air friction
    step_rate: f32,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(tuning: &Tuning) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = tuning.physics_dt();
        integration_parameters.length_unit = tuning.pixels_per_meter;

        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            registry: BodyRegistry::default(),
            gravity: to_vector(tuning.gravity),
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            contacts: ContactBuffer::default(),
            step_rate: tuning.physics_hz,
        }
    }

    /// Damping equivalent of a per-step air friction coefficient
    pub fn damping_for(&self, air_friction: f32) -> f32 {
        air_friction_to_damping(air_friction, self.step_rate)
    }

    /// Add a fixed rectangle (wall or obstacle)
    pub fn add_static_rect(&mut self, rect: &Rect, kind: BodyKind) -> RigidBodyHandle {
        debug_assert!(kind.is_static());
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(rect.center()))
            .user_data(kind.to_user_data())
            .build();
        let handle = self.bodies.insert(body);
        let half = rect.half_extents();
        let collider = ColliderBuilder::cuboid(half.x, half.y)
            .collision_groups(kind.interaction_groups())
            .active_events(kind.active_events())
            .user_data(kind.to_user_data())
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        self.registry.statics.push((handle, kind));
        handle
    }

    /// Four walls just outside the canvas
    pub fn add_boundary(&mut self, tuning: &Tuning) {
        let (w, h, t) = (tuning.canvas_width, tuning.canvas_height, tuning.wall_thickness);
        let walls = [
            Rect::new(w / 2.0, h + t / 2.0, w + 2.0 * t, t), // floor
            Rect::new(-t / 2.0, h / 2.0, t, h),              // left
            Rect::new(w + t / 2.0, h / 2.0, t, h),           // right
            Rect::new(w / 2.0, -t / 2.0, w + 2.0 * t, t),    // ceiling
        ];
        for wall in &walls {
            self.add_static_rect(wall, BodyKind::Wall);
        }
    }

    /// Add the protected target; replaces any previous target handle
    pub fn add_target(&mut self, pos: Vec2, tuning: &Tuning) -> RigidBodyHandle {
        let kind = BodyKind::Target;
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(pos))
            .linear_damping(self.damping_for(tuning.target_air_friction))
            .angular_damping(self.damping_for(tuning.target_air_friction))
            .user_data(kind.to_user_data())
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(tuning.target_radius)
            .density(tuning.target_density)
            .restitution(tuning.target_restitution)
            .friction(tuning.target_friction)
            .collision_groups(kind.interaction_groups())
            .active_events(kind.active_events())
            .user_data(kind.to_user_data())
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        self.bodies[handle].recompute_mass_properties_from_colliders(&self.colliders);
        self.registry.target = Some(handle);
        handle
    }

    /// Add one pursuer at `pos`
    pub fn add_pursuer(
        &mut self,
        pos: Vec2,
        profile: &PursuerProfile,
        tuning: &Tuning,
    ) -> RigidBodyHandle {
        let kind = BodyKind::Pursuer;
        let damping = self.damping_for(profile.air_friction);
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(pos))
            .linear_damping(damping)
            .angular_damping(damping)
            .ccd_enabled(true)
            .user_data(kind.to_user_data())
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(tuning.pursuer_radius)
            .density(profile.density)
            .restitution(profile.restitution)
            .friction(tuning.pursuer_friction)
            .collision_groups(kind.interaction_groups())
            .active_events(kind.active_events())
            .user_data(kind.to_user_data())
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        self.bodies[handle].recompute_mass_properties_from_colliders(&self.colliders);
        self.registry.pursuers.push(handle);
        handle
    }

    /// Remove a pursuer and its colliders
    pub fn remove_pursuer(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.registry.pursuers.retain(|&h| h != handle);
    }

    pub fn target_position(&self) -> Option<Vec2> {
        let handle = self.registry.target?;
        self.bodies.get(handle).map(|b| from_vector(b.translation()))
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| from_vector(b.translation()))
    }

    pub fn pursuer_count(&self) -> usize {
        self.registry.pursuers.len()
    }

    /// Kind tag of a collider, if it is still alive and tagged
    pub fn collider_kind(&self, handle: ColliderHandle) -> Option<BodyKind> {
        self.colliders
            .get(handle)
            .and_then(|c| BodyKind::from_user_data(c.user_data))
    }

    /// Advance one fixed step and return the contacts that started during it
    pub fn step(&mut self) -> Vec<Contact> {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.contacts,
        );

        self.contacts
            .drain()
            .into_iter()
            .filter_map(|(h1, h2)| {
                let kinds = (self.collider_kind(h1)?, self.collider_kind(h2)?);
                let parent = |h| self.colliders.get(h).and_then(|c| c.parent());
                Some(Contact {
                    kinds,
                    bodies: (parent(h1), parent(h2)),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_tuning() -> Tuning {
        Tuning {
            gravity: Vec2::ZERO,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_registry_tracks_bodies() {
        let tuning = quiet_tuning();
        let mut world = PhysicsWorld::new(&tuning);
        world.add_boundary(&tuning);
        assert_eq!(world.registry.statics.len(), 4);
        assert!(world.target_position().is_none());

        world.add_target(Vec2::new(200.0, 550.0), &tuning);
        let profile = PursuerProfile::for_level(1);
        let p = world.add_pursuer(Vec2::new(200.0, 120.0), &profile, &tuning);
        assert_eq!(world.pursuer_count(), 1);
        assert_eq!(world.target_position(), Some(Vec2::new(200.0, 550.0)));

        world.remove_pursuer(p);
        assert_eq!(world.pursuer_count(), 0);
        assert!(world.position(p).is_none());
    }

    #[test]
    fn test_overlapping_target_and_pursuer_report_strike() {
        let tuning = quiet_tuning();
        let mut world = PhysicsWorld::new(&tuning);
        world.add_target(Vec2::new(200.0, 300.0), &tuning);
        let profile = PursuerProfile::for_level(1);
        world.add_pursuer(Vec2::new(210.0, 300.0), &profile, &tuning);

        let contacts = world.step();
        assert!(contacts.iter().any(Contact::is_target_strike));
    }

    #[test]
    fn test_distant_bodies_report_nothing() {
        let tuning = quiet_tuning();
        let mut world = PhysicsWorld::new(&tuning);
        world.add_target(Vec2::new(200.0, 600.0), &tuning);
        let profile = PursuerProfile::for_level(1);
        world.add_pursuer(Vec2::new(200.0, 100.0), &profile, &tuning);

        for _ in 0..10 {
            assert!(world.step().is_empty());
        }
    }

    #[test]
    fn test_pursuer_material_follows_tuning() {
        let tuning = Tuning {
            pursuer_friction: 0.25,
            ..quiet_tuning()
        };
        let mut world = PhysicsWorld::new(&tuning);
        let profile = PursuerProfile::for_level(3);
        let handle = world.add_pursuer(Vec2::new(100.0, 100.0), &profile, &tuning);

        let collider = world.bodies[handle].colliders()[0];
        let collider = &world.colliders[collider];
        assert_eq!(collider.friction(), 0.25);
        assert_eq!(collider.restitution(), profile.restitution);
        assert_eq!(Tuning::default().pursuer_friction, 0.1);
    }

    #[test]
    fn test_strike_classification() {
        let strike = Contact {
            kinds: (BodyKind::Pursuer, BodyKind::Target),
            bodies: (None, None),
        };
        assert!(strike.is_target_strike());

        let blocked = Contact {
            kinds: (BodyKind::Pursuer, BodyKind::BarrierSegment),
            bodies: (None, None),
        };
        assert!(!blocked.is_target_strike());

        let obstacle = Contact {
            kinds: (BodyKind::Obstacle, BodyKind::Pursuer),
            bodies: (None, None),
        };
        assert!(!obstacle.is_target_strike());
    }
}
