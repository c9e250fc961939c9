//! Drawing constraints
//!
//! Pure predicates over the level geometry deciding where ink may go.

use glam::Vec2;

use super::geometry::{Rect, Zone, segment_crosses_rect};
use super::level::LevelDescriptor;
use crate::settings::Tuning;

/// No-draw zones and obstacle footprints for one level
#[derive(Debug, Clone)]
pub struct Constraints {
    pub zones: Vec<Zone>,
    pub obstacles: Vec<Rect>,
}

impl Constraints {
    pub fn for_level(level: &LevelDescriptor, tuning: &Tuning) -> Self {
        let mut zones = Vec::with_capacity(level.spawn_zones.len() + 1);
        zones.extend(
            level
                .spawn_zones
                .iter()
                .map(|&p| Zone::new(p, tuning.forbidden_radius_spawn)),
        );
        zones.push(Zone::new(level.target, tuning.forbidden_radius_target));

        Self {
            zones,
            obstacles: level.obstacles.clone(),
        }
    }

    /// Inside a protected zone or an obstacle
    pub fn is_forbidden_point(&self, p: Vec2) -> bool {
        self.zones.iter().any(|z| z.contains(p)) || self.obstacles.iter().any(|o| o.contains(p))
    }

    /// Segment cuts through an obstacle edge
    pub fn is_segment_blocked(&self, p1: Vec2, p2: Vec2) -> bool {
        self.obstacles
            .iter()
            .any(|o| segment_crosses_rect(p1, p2, o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level_one() -> LevelDescriptor {
        LevelDescriptor {
            target: Vec2::new(200.0, 550.0),
            spawn_zones: vec![Vec2::new(200.0, 120.0)],
            obstacles: vec![
                Rect::new(100.0, 280.0, 60.0, 20.0),
                Rect::new(300.0, 280.0, 60.0, 20.0),
            ],
            pursuer_count: 10,
        }
    }

    fn constraints() -> Constraints {
        Constraints::for_level(&level_one(), &Tuning::default())
    }

    #[test]
    fn test_zone_radii() {
        let c = constraints();
        // Spawn zone radius 70
        assert!(c.is_forbidden_point(Vec2::new(200.0, 189.0)));
        assert!(!c.is_forbidden_point(Vec2::new(200.0, 190.0)));
        // Target zone radius 50
        assert!(c.is_forbidden_point(Vec2::new(200.0, 501.0)));
        assert!(!c.is_forbidden_point(Vec2::new(200.0, 500.0)));
    }

    #[test]
    fn test_inside_obstacle_forbidden() {
        let c = constraints();
        assert!(c.is_forbidden_point(Vec2::new(100.0, 280.0)));
        assert!(c.is_forbidden_point(Vec2::new(130.0, 290.0)));
        assert!(!c.is_forbidden_point(Vec2::new(131.0, 280.0)));
    }

    #[test]
    fn test_segment_through_obstacle_blocked() {
        let c = constraints();
        assert!(c.is_segment_blocked(Vec2::new(50.0, 280.0), Vec2::new(150.0, 280.0)));
        assert!(c.is_segment_blocked(Vec2::new(100.0, 250.0), Vec2::new(100.0, 310.0)));
        // Between the two obstacles
        assert!(!c.is_segment_blocked(Vec2::new(180.0, 250.0), Vec2::new(220.0, 310.0)));
    }

    #[test]
    fn test_zones_do_not_block_segments() {
        // Only obstacles block crossings; zones only gate endpoints
        let c = constraints();
        assert!(!c.is_segment_blocked(Vec2::new(100.0, 120.0), Vec2::new(300.0, 120.0)));
    }

    proptest! {
        #[test]
        fn prop_forbidden_point_is_pure(x in 0.0f32..400.0, y in 0.0f32..700.0) {
            let c = constraints();
            let p = Vec2::new(x, y);
            prop_assert_eq!(c.is_forbidden_point(p), c.is_forbidden_point(p));
            prop_assert_eq!(
                c.is_forbidden_point(p),
                Constraints::for_level(&level_one(), &Tuning::default()).is_forbidden_point(p)
            );
        }

        #[test]
        fn prop_segments_below_obstacles_pass(
            x1 in 0.0f32..400.0, x2 in 0.0f32..400.0,
            y1 in 300.0f32..700.0, y2 in 300.0f32..700.0,
        ) {
            // Obstacles end at y = 290
            let c = constraints();
            prop_assert!(!c.is_segment_blocked(Vec2::new(x1, y1), Vec2::new(x2, y2)));
        }
    }
}
