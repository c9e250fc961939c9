//! Fixed timestep round driver
//!
//! [`Round`] owns the physics world and all round state. Pointer handlers
//! and the frame driver are the only entry points that mutate it, and a
//! barrier only ever enters the world through [`build_barrier`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rapier2d::prelude::RigidBodyHandle;

use super::barrier::build_barrier;
use super::categories::BodyKind;
use super::constraints::Constraints;
use super::ink::{Extend, Release, Sketch, SketchRules};
use super::level::LevelDescriptor;
use super::snapshot::{BodySnapshot, Snapshot};
use super::state::{RoundEvent, RoundPhase, RoundState};
use super::steering::{SeededNoise, SteeringNoise, apply_pursuit};
use super::world::{Contact, PhysicsWorld};
use crate::consts::MAX_FRAME_DT;
use crate::from_vector;
use crate::settings::{PursuerProfile, Tuning};

/// One round of play on a single level
pub struct Round {
    tuning: Tuning,
    level: LevelDescriptor,
    /// 1-based difficulty level
    level_number: u32,
    world: PhysicsWorld,
    constraints: Constraints,
    sketch: Sketch,
    state: RoundState,
    noise: Box<dyn SteeringNoise>,
    spawn_rng: Pcg32,
    /// Unsimulated frame time carried to the next update
    accumulator: f32,
    events: Vec<RoundEvent>,
}

impl Round {
    /// Create a round and run its setup phase
    pub fn new(level: LevelDescriptor, tuning: Tuning, level_number: u32, seed: u64) -> Self {
        let noise = Box::new(SeededNoise::new(seed ^ 0x9e37_79b9_7f4a_7c15));
        Self::with_noise(level, tuning, level_number, seed, noise)
    }

    /// Create a round with a caller-supplied steering noise source
    pub fn with_noise(
        level: LevelDescriptor,
        tuning: Tuning,
        level_number: u32,
        seed: u64,
        noise: Box<dyn SteeringNoise>,
    ) -> Self {
        let constraints = Constraints::for_level(&level, &tuning);
        let mut round = Self {
            world: PhysicsWorld::new(&tuning),
            sketch: Sketch::new(SketchRules::from(&tuning)),
            state: RoundState::new(&tuning),
            spawn_rng: Pcg32::seed_from_u64(seed),
            accumulator: 0.0,
            events: Vec::new(),
            constraints,
            noise,
            tuning,
            level,
            level_number: level_number.max(1),
        };
        round.reset();
        round
    }

    /// Rebuild the world from the level descriptor and return to drawing
    pub fn reset(&mut self) {
        self.state = RoundState::new(&self.tuning);
        self.sketch = Sketch::new(SketchRules::from(&self.tuning));
        self.accumulator = 0.0;
        self.events.clear();

        let mut world = PhysicsWorld::new(&self.tuning);
        world.add_boundary(&self.tuning);
        for obstacle in &self.level.obstacles {
            world.add_static_rect(obstacle, BodyKind::Obstacle);
        }
        world.add_target(self.level.target, &self.tuning);
        self.world = world;

        log::info!(
            "round setup: level {}, {} spawn zones, {} obstacles",
            self.level_number,
            self.level.spawn_zones.len(),
            self.level.obstacles.len()
        );
        self.state.phase = RoundPhase::Drawing;
    }

    // === Accessors ===

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    pub fn ink_remaining(&self) -> f32 {
        self.state.ink.remaining()
    }

    pub fn forbidden_hover(&self) -> bool {
        self.sketch.forbidden_hover()
    }

    pub fn sketch_path(&self) -> &[Vec2] {
        self.sketch.path()
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    // === Pointer input ===

    /// Start a gesture. Returns false if the point is forbidden or the round
    /// is not accepting drawings.
    pub fn pointer_down(&mut self, p: Vec2) -> bool {
        if self.state.phase != RoundPhase::Drawing {
            return false;
        }
        self.sketch.begin(p, &self.constraints)
    }

    /// Extend the current gesture. Running out of ink ends the gesture as if
    /// the pointer had been released.
    pub fn pointer_move(&mut self, p: Vec2) -> Extend {
        if self.state.phase != RoundPhase::Drawing {
            return Extend::Idle;
        }
        let result = self.sketch.extend(p, &self.constraints, &mut self.state.ink);
        if result == Extend::OutOfInk {
            self.pointer_up();
        }
        result
    }

    /// Finish the current gesture
    pub fn pointer_up(&mut self) {
        if self.state.phase != RoundPhase::Drawing {
            return;
        }
        match self.sketch.release(&mut self.state.ink) {
            Release::Idle => {}
            Release::Discarded => self.events.push(RoundEvent::GestureDiscarded),
            Release::Commit(path) => self.commit(&path),
        }
    }

    /// Pointer left the drawing surface; drop the gesture entirely
    pub fn pointer_leave(&mut self) {
        if self.state.phase != RoundPhase::Drawing {
            return;
        }
        self.sketch.cancel(&mut self.state.ink);
    }

    fn commit(&mut self, path: &[Vec2]) {
        match build_barrier(&mut self.world, path, &self.tuning) {
            Ok(handle) => {
                let segments = self.world.bodies.get(handle).map_or(0, |b| b.colliders().len());
                self.events.push(RoundEvent::BarrierCommitted { segments });
                self.begin_pursuit();
            }
            Err(err) => {
                log::error!("barrier rejected after commit gate: {err}");
                self.state.ink.restore();
                self.events.push(RoundEvent::GestureDiscarded);
            }
        }
    }

    fn begin_pursuit(&mut self) {
        let count = self.spawn_pursuers();
        self.state.countdown.start();
        self.state.phase = RoundPhase::ActivePursuit;
        self.events.push(RoundEvent::PursuersSpawned { count });
        log::info!(
            "pursuit started: {count} pursuers, {}s to survive",
            self.state.countdown.remaining()
        );
    }

    fn spawn_pursuers(&mut self) -> u32 {
        let per_zone = self.level.pursuers_per_zone();
        let profile = PursuerProfile::for_level(self.level_number);
        let half = self.tuning.spawn_jitter / 2.0;
        let mut count = 0;

        for zone in &self.level.spawn_zones {
            for _ in 0..per_zone {
                let jitter = if half > 0.0 {
                    Vec2::new(
                        self.spawn_rng.random_range(-half..half),
                        self.spawn_rng.random_range(-half..half),
                    )
                } else {
                    Vec2::ZERO
                };
                self.world.add_pursuer(*zone + jitter, &profile, &self.tuning);
                count += 1;
            }
        }
        count
    }

    // === Simulation ===

    /// Advance one fixed physics step
    ///
    /// Terminal rounds are frozen. Returns the contacts that started during
    /// the step.
    pub fn step(&mut self) -> Vec<Contact> {
        if self.state.phase.is_terminal() {
            return Vec::new();
        }

        if self.state.phase == RoundPhase::ActivePursuit {
            apply_pursuit(&mut self.world, self.noise.as_mut(), &self.tuning);
        }
        let contacts = self.world.step();
        self.state.time_ticks += 1;

        if self.state.phase == RoundPhase::ActivePursuit
            && contacts.iter().any(Contact::is_target_strike)
        {
            self.lose();
        }
        contacts
    }

    /// Feed wall-clock time to the protection countdown
    pub fn advance_clock(&mut self, elapsed: f32) {
        if self.state.phase != RoundPhase::ActivePursuit {
            return;
        }
        let before = self.state.countdown.remaining();
        let ticks = self.state.countdown.advance(elapsed);
        for i in 1..=ticks {
            let remaining = before - i;
            log::debug!("countdown: {remaining}s left");
            self.events.push(RoundEvent::CountdownTick { remaining });
        }
        if self.state.countdown.expired() {
            self.win();
        }
    }

    /// Run one rendered frame: fixed physics steps, then the countdown
    ///
    /// Physics time is clamped per frame; the countdown sees the raw frame time.
    pub fn update(&mut self, frame_dt: f32) {
        let dt = self.tuning.physics_dt();
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < self.tuning.max_substeps {
            self.step();
            self.accumulator -= dt;
            substeps += 1;
        }

        self.advance_clock(frame_dt);
    }

    fn win(&mut self) {
        self.state.phase = RoundPhase::Won;
        self.state.countdown.cancel();
        self.events.push(RoundEvent::Won);
        log::info!("round won after {} ticks", self.state.time_ticks);
    }

    fn lose(&mut self) {
        self.state.phase = RoundPhase::Lost;
        self.state.countdown.cancel();
        self.events.push(RoundEvent::Lost);
        log::info!("round lost with {}s left", self.state.countdown.remaining());
    }

    // === Output ===

    /// Poses of every body and barrier segment, for rendering
    pub fn snapshot(&self) -> Snapshot {
        let mut bodies = Vec::new();
        let registry = &self.world.registry;

        for &(handle, kind) in &registry.statics {
            self.push_body(&mut bodies, handle, kind);
        }
        if let Some(target) = registry.target {
            self.push_body(&mut bodies, target, BodyKind::Target);
        }
        for &pursuer in &registry.pursuers {
            self.push_body(&mut bodies, pursuer, BodyKind::Pursuer);
        }
        for &barrier in &registry.barriers {
            let Some(body) = self.world.bodies.get(barrier) else {
                continue;
            };
            for &collider in body.colliders() {
                let Some(collider) = self.world.colliders.get(collider) else {
                    continue;
                };
                let pose = collider.position();
                bodies.push(BodySnapshot {
                    kind: BodyKind::BarrierSegment,
                    position: from_vector(&pose.translation.vector),
                    angle: pose.rotation.angle(),
                    heading: pose.rotation.angle(),
                    visible: BodyKind::BarrierSegment.default_visible(),
                });
            }
        }

        Snapshot {
            phase: self.state.phase,
            ink_remaining: self.state.ink.remaining(),
            ink_max: self.state.ink.max(),
            forbidden_hover: self.sketch.forbidden_hover(),
            countdown: self.state.countdown.remaining(),
            sketch: self.sketch.path().to_vec(),
            bodies,
        }
    }

    fn push_body(&self, out: &mut Vec<BodySnapshot>, handle: RigidBodyHandle, kind: BodyKind) {
        let Some(body) = self.world.bodies.get(handle) else {
            return;
        };
        let angle = body.rotation().angle();
        let velocity = from_vector(body.linvel());
        let heading = if velocity.length_squared() > f32::EPSILON {
            velocity.y.atan2(velocity.x)
        } else {
            angle
        };
        out.push(BodySnapshot {
            kind,
            position: from_vector(body.translation()),
            angle,
            heading,
            visible: kind.default_visible(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use crate::sim::steering::NoNoise;

    fn open_level(spawn_zones: Vec<Vec2>, pursuer_count: u32) -> LevelDescriptor {
        LevelDescriptor {
            target: Vec2::new(200.0, 550.0),
            spawn_zones,
            obstacles: Vec::new(),
            pursuer_count,
        }
    }

    fn round_for(level: LevelDescriptor) -> Round {
        Round::with_noise(level, Tuning::default(), 1, 7, Box::new(NoNoise))
    }

    /// No gravity and no spawn jitter, so a lone pursuer heads straight down
    fn still_round(level: LevelDescriptor) -> Round {
        let tuning = Tuning {
            gravity: Vec2::ZERO,
            spawn_jitter: 0.0,
            ..Tuning::default()
        };
        Round::with_noise(level, tuning, 1, 7, Box::new(NoNoise))
    }

    fn touches(contact: &Contact, kind: BodyKind) -> bool {
        contact.kinds.0 == kind || contact.kinds.1 == kind
    }

    /// Horizontal stroke well away from every zone
    fn draw_line(round: &mut Round, y: f32) {
        assert!(round.pointer_down(Vec2::new(60.0, y)));
        let mut x = 60.0;
        while x < 340.0 {
            x += 20.0;
            assert_eq!(round.pointer_move(Vec2::new(x, y)), Extend::Accepted);
        }
        round.pointer_up();
    }

    #[test]
    fn test_new_round_is_drawing() {
        let round = round_for(LevelDescriptor::sample());
        assert_eq!(round.phase(), RoundPhase::Drawing);
        assert_eq!(round.ink_remaining(), round.tuning().max_ink);
        assert!(round.world().target_position().is_some());
        // 4 walls + 2 obstacles
        assert_eq!(round.world().registry.statics.len(), 6);
    }

    #[test]
    fn test_short_gesture_adds_nothing() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 3));
        assert!(round.pointer_down(Vec2::new(100.0, 300.0)));
        round.pointer_move(Vec2::new(120.0, 300.0));
        round.pointer_move(Vec2::new(140.0, 300.0));
        round.pointer_up();

        assert_eq!(round.phase(), RoundPhase::Drawing);
        assert!(round.world().registry.barriers.is_empty());
        assert_eq!(round.ink_remaining(), round.tuning().max_ink);
        assert_eq!(round.drain_events(), vec![RoundEvent::GestureDiscarded]);
    }

    #[test]
    fn test_pointer_leave_refunds_ink() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 3));
        assert!(round.pointer_down(Vec2::new(60.0, 300.0)));
        for i in 1..=6 {
            round.pointer_move(Vec2::new(60.0 + 20.0 * i as f32, 300.0));
        }
        assert!(round.ink_remaining() < round.tuning().max_ink);

        round.pointer_leave();
        assert!(round.sketch_path().is_empty());
        assert!(!round.forbidden_hover());
        assert_eq!(round.ink_remaining(), round.tuning().max_ink);
        assert_eq!(round.phase(), RoundPhase::Drawing);
    }

    #[test]
    fn test_pointer_down_in_zone_sets_hover() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 3));
        assert!(!round.pointer_down(Vec2::new(205.0, 105.0)));
        assert!(round.forbidden_hover());
        assert!(round.sketch_path().is_empty());
    }

    #[test]
    fn test_steering_idle_before_barrier() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 3));
        for _ in 0..30 {
            round.step();
        }
        assert_eq!(round.phase(), RoundPhase::Drawing);
        assert_eq!(round.world().pursuer_count(), 0);
        assert_eq!(round.state().countdown.remaining(), round.tuning().protect_time);
    }

    #[test]
    fn test_commit_starts_pursuit() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 4));
        draw_line(&mut round, 300.0);

        assert_eq!(round.phase(), RoundPhase::ActivePursuit);
        assert_eq!(round.world().registry.barriers.len(), 1);
        assert_eq!(round.world().pursuer_count(), 4);
        assert!(round.state().countdown.is_running());
        assert_eq!(
            round.drain_events(),
            vec![
                RoundEvent::BarrierCommitted { segments: 14 },
                RoundEvent::PursuersSpawned { count: 4 },
            ]
        );

        // Drawing is closed once pursuit starts
        assert!(!round.pointer_down(Vec2::new(60.0, 400.0)));
    }

    #[test]
    fn test_pursuers_split_across_zones() {
        let zones = vec![
            Vec2::new(80.0, 100.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(320.0, 100.0),
        ];
        let mut round = round_for(open_level(zones, 10));
        draw_line(&mut round, 300.0);
        assert_eq!(round.world().pursuer_count(), 9);
    }

    #[test]
    fn test_pursuers_spawn_within_jitter() {
        let zone = Vec2::new(200.0, 100.0);
        let mut round = round_for(open_level(vec![zone], 6));
        draw_line(&mut round, 300.0);

        let half = round.tuning().spawn_jitter / 2.0;
        for &handle in &round.world().registry.pursuers {
            let pos = round.world().position(handle).unwrap();
            assert!((pos.x - zone.x).abs() <= half);
            assert!((pos.y - zone.y).abs() <= half);
        }
    }

    #[test]
    fn test_countdown_expiry_wins() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 3));
        draw_line(&mut round, 300.0);
        round.drain_events();

        round.advance_clock(10.0);
        assert_eq!(round.phase(), RoundPhase::Won);
        let events = round.drain_events();
        assert_eq!(events.last(), Some(&RoundEvent::Won));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, RoundEvent::CountdownTick { .. }))
                .count(),
            10
        );
    }

    #[test]
    fn test_frame_driver_wins_without_pursuers() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 0));
        draw_line(&mut round, 300.0);
        assert_eq!(round.phase(), RoundPhase::ActivePursuit);

        for _ in 0..700 {
            round.update(1.0 / 60.0);
            if round.phase().is_terminal() {
                break;
            }
        }
        assert_eq!(round.phase(), RoundPhase::Won);
        assert!(round.state().time_ticks > 500);
    }

    #[test]
    fn test_target_contact_loses() {
        // Pursuers spawn on top of the target
        let mut level = open_level(vec![Vec2::new(200.0, 550.0)], 3);
        level.target = Vec2::new(200.0, 550.0);
        let mut round = round_for(level);
        draw_line(&mut round, 300.0);
        assert_eq!(round.phase(), RoundPhase::ActivePursuit);

        let contacts = round.step();
        assert!(contacts.iter().any(Contact::is_target_strike));
        assert_eq!(round.phase(), RoundPhase::Lost);
        assert!(!round.state().countdown.is_running());

        // Countdown state is gone; time passing changes nothing
        round.advance_clock(20.0);
        assert_eq!(round.phase(), RoundPhase::Lost);
        assert!(round.drain_events().contains(&RoundEvent::Lost));
        assert!(round.step().is_empty());
    }

    #[test]
    fn test_barrier_stops_pursuer_without_ending_round() {
        let mut level = open_level(vec![Vec2::new(200.0, 150.0)], 1);
        level.target = Vec2::new(200.0, 600.0);
        let mut round = still_round(level);
        draw_line(&mut round, 350.0);
        assert_eq!(round.phase(), RoundPhase::ActivePursuit);

        let barrier = round.world().registry.barriers[0];
        let pursuer = round.world().registry.pursuers[0];
        let mut hit_barrier = false;
        for _ in 0..300 {
            let contacts = round.step();
            assert!(!contacts.iter().any(Contact::is_target_strike));
            hit_barrier |= contacts
                .iter()
                .any(|c| touches(c, BodyKind::Pursuer) && touches(c, BodyKind::BarrierSegment));

            let barrier_y = round.world().position(barrier).unwrap().y;
            let pursuer_y = round.world().position(pursuer).unwrap().y;
            assert!(pursuer_y < barrier_y, "pursuer crossed the barrier");
        }
        assert!(hit_barrier);
        assert_eq!(round.phase(), RoundPhase::ActivePursuit);
    }

    #[test]
    fn test_obstacle_stops_pursuer_without_ending_round() {
        let mut level = open_level(vec![Vec2::new(200.0, 150.0)], 1);
        level.target = Vec2::new(200.0, 600.0);
        level.obstacles = vec![Rect::new(200.0, 350.0, 300.0, 20.0)];
        let mut round = still_round(level);
        // Stroke behind the pursuer, out of its way
        draw_line(&mut round, 50.0);
        assert_eq!(round.phase(), RoundPhase::ActivePursuit);

        let pursuer = round.world().registry.pursuers[0];
        let mut hit_obstacle = false;
        for _ in 0..300 {
            let contacts = round.step();
            assert!(!contacts.iter().any(Contact::is_target_strike));
            hit_obstacle |= contacts
                .iter()
                .any(|c| touches(c, BodyKind::Pursuer) && touches(c, BodyKind::Obstacle));

            let pursuer_y = round.world().position(pursuer).unwrap().y;
            assert!(pursuer_y < 340.0, "pursuer crossed the obstacle");
        }
        assert!(hit_obstacle);
        assert_eq!(round.phase(), RoundPhase::ActivePursuit);
    }

    #[test]
    fn test_committed_segments_skip_repeated_points() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 0));
        let path = [
            Vec2::new(60.0, 300.0),
            Vec2::new(100.0, 300.0),
            Vec2::new(100.0, 300.0),
            Vec2::new(140.0, 300.0),
            Vec2::new(180.0, 300.0),
        ];
        round.commit(&path);

        assert_eq!(round.phase(), RoundPhase::ActivePursuit);
        assert_eq!(
            round.drain_events(),
            vec![
                RoundEvent::BarrierCommitted { segments: 3 },
                RoundEvent::PursuersSpawned { count: 0 },
            ]
        );
    }

    #[test]
    fn test_reset_clears_round() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 3));
        draw_line(&mut round, 300.0);
        round.reset();

        assert_eq!(round.phase(), RoundPhase::Drawing);
        assert!(round.world().registry.barriers.is_empty());
        assert_eq!(round.world().pursuer_count(), 0);
        assert_eq!(round.ink_remaining(), round.tuning().max_ink);
        assert!(round.drain_events().is_empty());
    }

    #[test]
    fn test_snapshot_reports_bodies() {
        let mut round = round_for(open_level(vec![Vec2::new(200.0, 100.0)], 3));
        draw_line(&mut round, 300.0);
        let snapshot = round.snapshot();

        assert_eq!(snapshot.phase, RoundPhase::ActivePursuit);
        assert_eq!(snapshot.count(BodyKind::Wall), 4);
        assert_eq!(snapshot.count(BodyKind::Target), 1);
        assert_eq!(snapshot.count(BodyKind::Pursuer), 3);
        assert_eq!(snapshot.count(BodyKind::BarrierSegment), 14);
        assert!(snapshot
            .bodies
            .iter()
            .filter(|b| b.kind == BodyKind::Pursuer)
            .all(|b| !b.visible));

        let segment = snapshot
            .bodies
            .iter()
            .find(|b| b.kind == BodyKind::BarrierSegment)
            .unwrap();
        assert!((segment.position.y - 300.0).abs() < 1e-3);
        assert!(segment.angle.abs() < 1e-4);
    }
}
