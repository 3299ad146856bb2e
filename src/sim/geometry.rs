//! Planar pose and vector helpers
//!
//! Vectors are `glam::Vec2`; this module adds the few operations the soccer
//! physics needs on top of it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position plus heading on the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    /// Heading (radians, not wrapped)
    pub rotation: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            rotation,
        }
    }

    /// Distance between positions (rotation ignored)
    #[inline]
    pub fn distance(&self, other: &Pose) -> f32 {
        self.position.distance(other.position)
    }

    /// Unit vector along the heading
    #[inline]
    pub fn heading_vector(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }
}

/// Normalize, mapping the zero vector to `(1, 0)`
#[inline]
pub fn normalize_or_x(v: Vec2) -> Vec2 {
    let m = v.length();
    if m == 0.0 {
        return Vec2::X;
    }
    v / m
}

/// Direction vector `from - to` (points from `to` toward `from`)
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    from - to
}
