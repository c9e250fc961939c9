//! Ink budget and gesture capture
//!
//! A [`Sketch`] collects one pointer gesture, checking every point against
//! [`Constraints`] and paying for every accepted extension out of the
//! [`InkBudget`]. It never touches the physics world: a successful release
//! hands the finished path back to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::constraints::Constraints;
use crate::settings::Tuning;

/// Depletable drawing resource, always within `[0, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkBudget {
    max: f32,
    remaining: f32,
}

impl InkBudget {
    pub fn new(max: f32) -> Self {
        Self {
            max,
            remaining: max,
        }
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn used(&self) -> f32 {
        self.max - self.remaining
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Spend `amount`, flooring at zero
    pub fn consume(&mut self, amount: f32) {
        self.remaining = (self.remaining - amount).max(0.0);
    }

    /// Refill to max
    pub fn restore(&mut self) {
        self.remaining = self.max;
    }
}

/// Result of a pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extend {
    /// No gesture in progress
    Idle,
    /// Point recorded and paid for
    Accepted,
    /// Pointer moved less than the minimum step
    TooShort,
    /// Point in a forbidden zone or the segment crosses an obstacle
    Blocked,
    /// Budget exhausted; the gesture should be released
    OutOfInk,
}

/// Result of releasing the pointer
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    /// No gesture in progress
    Idle,
    /// Accidental tap or drag; ink was refunded
    Discarded,
    /// Path ready for the barrier constructor
    Commit(Vec<Vec2>),
}

/// Minimums a gesture must meet to be committed
#[derive(Debug, Clone, Copy)]
pub struct SketchRules {
    pub min_step: f32,
    pub min_points: usize,
    pub min_ink_usage: f32,
}

impl From<&Tuning> for SketchRules {
    fn from(tuning: &Tuning) -> Self {
        Self {
            min_step: tuning.min_step,
            min_points: tuning.min_points,
            min_ink_usage: tuning.min_ink_usage,
        }
    }
}

/// One in-progress drawing gesture
#[derive(Debug, Clone)]
pub struct Sketch {
    rules: SketchRules,
    path: Vec<Vec2>,
    forbidden_hover: bool,
}

impl Sketch {
    pub fn new(rules: SketchRules) -> Self {
        Self {
            rules,
            path: Vec::new(),
            forbidden_hover: false,
        }
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn is_drawing(&self) -> bool {
        !self.path.is_empty()
    }

    /// Pointer is over territory where ink is not allowed
    pub fn forbidden_hover(&self) -> bool {
        self.forbidden_hover
    }

    /// Start a gesture; refused on forbidden points
    pub fn begin(&mut self, p: Vec2, constraints: &Constraints) -> bool {
        if constraints.is_forbidden_point(p) {
            self.forbidden_hover = true;
            return false;
        }
        self.path.clear();
        self.path.push(p);
        self.forbidden_hover = false;
        true
    }

    /// Try to extend the gesture to `p`
    pub fn extend(&mut self, p: Vec2, constraints: &Constraints, ink: &mut InkBudget) -> Extend {
        let forbidden = constraints.is_forbidden_point(p);
        self.forbidden_hover = forbidden;

        let Some(&last) = self.path.last() else {
            return Extend::Idle;
        };
        if ink.is_empty() {
            return Extend::OutOfInk;
        }
        if forbidden || constraints.is_segment_blocked(last, p) {
            self.forbidden_hover = true;
            return Extend::Blocked;
        }

        let dist = last.distance(p);
        if dist > self.rules.min_step {
            ink.consume(dist);
            self.path.push(p);
            Extend::Accepted
        } else {
            Extend::TooShort
        }
    }

    /// Finish the gesture, either committing the path or refunding the ink
    pub fn release(&mut self, ink: &mut InkBudget) -> Release {
        self.forbidden_hover = false;
        let was_drawing = self.is_drawing();
        let path = std::mem::take(&mut self.path);

        let used = ink.used();
        if path.len() < self.rules.min_points || used < self.rules.min_ink_usage {
            ink.restore();
            if was_drawing {
                log::debug!("gesture discarded: {} points, {used:.1} ink used", path.len());
                return Release::Discarded;
            }
            return Release::Idle;
        }
        Release::Commit(path)
    }

    /// Abandon the gesture with no residual state
    pub fn cancel(&mut self, ink: &mut InkBudget) {
        if self.is_drawing() {
            log::debug!("gesture cancelled after {} points", self.path.len());
        }
        self.path.clear();
        self.forbidden_hover = false;
        ink.restore();
    }
}
