//! Level descriptor
//!
//! Level layouts are produced elsewhere; the round only reads them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::error::{ConfigError, read_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Where the target body starts
    pub target: Vec2,
    /// Pursuer spawn points
    pub spawn_zones: Vec<Vec2>,
    /// Static obstacle footprints
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    /// Total pursuers requested; split evenly across spawn zones
    pub pursuer_count: u32,
}

impl LevelDescriptor {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a level from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Self::from_json(&read_json(path.as_ref())?)
    }

    /// Pursuers spawned at each zone. The remainder is dropped.
    pub fn pursuers_per_zone(&self) -> u32 {
        match self.spawn_zones.len() {
            0 => 0,
            zones => self.pursuer_count / zones as u32,
        }
    }

    /// Opening layout: one nest at the top, target near the bottom
    pub fn sample() -> Self {
        Self {
            target: Vec2::new(200.0, 550.0),
            spawn_zones: vec![Vec2::new(200.0, 120.0)],
            obstacles: vec![
                Rect::new(100.0, 280.0, 60.0, 20.0),
                Rect::new(300.0, 280.0, 60.0, 20.0),
            ],
            pursuer_count: 10,
        }
    }
}
