//! Plane geometry for drawing validation
//!
//! Points are plain `glam::Vec2` in simulation space (pixels, y down).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, center-based
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Center x
    pub x: f32,
    /// Center y
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.w / 2.0, self.h / 2.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.w / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y - self.h / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Point-in-rectangle, edges included
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// The four boundary edges, clockwise from the top edge
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.left(), self.top());
        let tr = Vec2::new(self.right(), self.top());
        let br = Vec2::new(self.right(), self.bottom());
        let bl = Vec2::new(self.left(), self.bottom());
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}

/// A circular no-draw region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub center: Vec2,
    pub radius: f32,
}

impl Zone {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strictly inside; a point exactly on the rim is allowed
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance(p) < self.radius
    }
}

/// 2D cross product (z component)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Proper intersection of segments `a→b` and `c→d`
///
/// Both parameters must lie in the open interval (0, 1), so touching at an
/// endpoint does not count. Parallel and collinear pairs (zero determinant)
/// never intersect.
pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let r = b - a;
    let s = d - c;
    let det = cross(r, s);
    if det == 0.0 {
        return false;
    }
    let ac = c - a;
    let t = cross(ac, s) / det;
    let u = cross(ac, r) / det;
    (0.0 < t && t < 1.0) && (0.0 < u && u < 1.0)
}

/// Does segment `a→b` cross any edge of `rect`?
pub fn segment_crosses_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    rect.edges()
        .iter()
        .any(|&(c, d)| segments_intersect(a, b, c, d))
}

/// Total length of a polyline
pub fn path_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
