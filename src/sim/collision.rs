//! Axis-aligned collision tests

use glam::Vec2;

/// Axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Box scaled by `factor` around its own center
    pub fn scaled(&self, factor: f32) -> Self {
        let size = self.size * factor;
        Self::new(self.min + (self.size - size) * 0.5, size)
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        a_max.x > other.min.x && self.min.x < b_max.x && a_max.y > other.min.y && self.min.y < b_max.y
    }
}

/// Landing test for a body already moved this tick.
///
/// The body's bottom edge must lie inside the platform's vertical extent
/// widened downward by the current fall speed, so a fast fall cannot step
/// clean through a thin platform between two ticks.
pub fn lands_on(body: &Aabb, vy: f32, platform: &Aabb) -> bool {
    if vy < 0.0 {
        return false;
    }
    let bottom = body.max().y;
    let horizontal = body.max().x > platform.min.x && body.min.x < platform.max().x;
    horizontal && bottom > platform.min.y && bottom < platform.max().y + vy + 1.0
}
