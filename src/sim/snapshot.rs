//! Render snapshots
//!
//! A flat, serializable view of the round for whatever draws it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::categories::BodyKind;
use super::state::RoundPhase;

/// Pose of one body (or one barrier segment)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub kind: BodyKind,
    pub position: Vec2,
    /// Body rotation (radians)
    pub angle: f32,
    /// Direction of travel; pursuers are drawn facing this way
    pub heading: f32,
    /// Whether a generic shape renderer should draw this body
    pub visible: bool,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub ink_remaining: f32,
    pub ink_max: f32,
    pub forbidden_hover: bool,
    pub countdown: u32,
    /// In-progress gesture, for preview drawing
    pub sketch: Vec<Vec2>,
    pub bodies: Vec<BodySnapshot>,
}

impl Snapshot {
    pub fn count(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.kind == kind).count()
    }
}
