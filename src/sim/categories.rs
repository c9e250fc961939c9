//! Collision categories
//!
//! Every body is exactly one [`BodyKind`]. Its category bit says what it is,
//! its mask says what it may touch. A pair interacts only when each side's
//! mask contains the other's category, which is also how the physics engine
//! tests interaction groups.

use rapier2d::prelude::{ActiveEvents, Group, InteractionGroups};
use serde::{Deserialize, Serialize};

pub const CATEGORY_WALL: u32 = 0x0001;
pub const CATEGORY_BARRIER: u32 = 0x0002;
pub const CATEGORY_TARGET: u32 = 0x0004;
pub const CATEGORY_PURSUER: u32 = 0x0008;
pub const CATEGORY_OBSTACLE: u32 = 0x0010;

/// Every category bit
pub const MASK_ALL: u32 =
    CATEGORY_WALL | CATEGORY_BARRIER | CATEGORY_TARGET | CATEGORY_PURSUER | CATEGORY_OBSTACLE;

/// Kind tag carried by every body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Wall,
    Target,
    Pursuer,
    Obstacle,
    BarrierSegment,
}

impl BodyKind {
    pub const ALL: [BodyKind; 5] = [
        BodyKind::Wall,
        BodyKind::Target,
        BodyKind::Pursuer,
        BodyKind::Obstacle,
        BodyKind::BarrierSegment,
    ];

    /// What this body is
    pub const fn category(self) -> u32 {
        match self {
            BodyKind::Wall => CATEGORY_WALL,
            BodyKind::Target => CATEGORY_TARGET,
            BodyKind::Pursuer => CATEGORY_PURSUER,
            BodyKind::Obstacle => CATEGORY_OBSTACLE,
            BodyKind::BarrierSegment => CATEGORY_BARRIER,
        }
    }

    /// What this body may collide with
    pub const fn mask(self) -> u32 {
        match self {
            // Barriers pass through the boundary but stack on each other
            BodyKind::BarrierSegment => {
                CATEGORY_TARGET | CATEGORY_PURSUER | CATEGORY_OBSTACLE | CATEGORY_BARRIER
            }
            BodyKind::Wall | BodyKind::Target | BodyKind::Pursuer | BodyKind::Obstacle => MASK_ALL,
        }
    }

    /// Static bodies never move after creation
    pub const fn is_static(self) -> bool {
        matches!(self, BodyKind::Wall | BodyKind::Obstacle)
    }

    /// Whether a default renderer should draw the body shape as-is.
    /// Target and pursuers are drawn as sprites by the presentation layer.
    pub const fn default_visible(self) -> bool {
        !matches!(self, BodyKind::Target | BodyKind::Pursuer)
    }

    /// Whether colliders of this kind report contact start/stop events
    pub const fn reports_contacts(self) -> bool {
        matches!(self, BodyKind::Target | BodyKind::Pursuer)
    }

    pub fn can_collide_with(self, other: BodyKind) -> bool {
        (self.mask() & other.category()) != 0 && (other.mask() & self.category()) != 0
    }

    pub fn interaction_groups(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.category()),
            Group::from_bits_truncate(self.mask()),
        )
    }

    pub fn active_events(self) -> ActiveEvents {
        if self.reports_contacts() {
            ActiveEvents::COLLISION_EVENTS
        } else {
            ActiveEvents::empty()
        }
    }

    /// Encoding stored in collider user data
    pub const fn to_user_data(self) -> u128 {
        match self {
            BodyKind::Wall => 1,
            BodyKind::Target => 2,
            BodyKind::Pursuer => 3,
            BodyKind::Obstacle => 4,
            BodyKind::BarrierSegment => 5,
        }
    }

    pub const fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(BodyKind::Wall),
            2 => Some(BodyKind::Target),
            3 => Some(BodyKind::Pursuer),
            4 => Some(BodyKind::Obstacle),
            5 => Some(BodyKind::BarrierSegment),
            _ => None,
        }
    }
}
