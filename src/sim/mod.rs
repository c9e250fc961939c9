//! Round simulation
//!
//! All gameplay logic lives here:
//! - Fixed timestep physics, driven by [`Round::update`]
//! - Seeded RNG for spawn jitter and steering noise
//! - No rendering or platform dependencies; output is a [`Snapshot`]

pub mod barrier;
pub mod categories;
pub mod constraints;
pub mod geometry;
pub mod ink;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod steering;
pub mod tick;
pub mod world;

pub use barrier::{BarrierSegment, BarrierShape, build_barrier};
pub use categories::BodyKind;
pub use constraints::Constraints;
pub use geometry::{Rect, Zone, segments_intersect};
pub use ink::{Extend, InkBudget, Release, Sketch, SketchRules};
pub use level::LevelDescriptor;
pub use snapshot::{BodySnapshot, Snapshot};
pub use state::{Countdown, RoundEvent, RoundPhase, RoundState};
pub use steering::{NoNoise, SeededNoise, SteeringNoise, apply_pursuit, pursuit_force};
pub use tick::Round;
pub use world::{BodyRegistry, Contact, PhysicsWorld};
