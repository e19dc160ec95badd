//! Shrinking circular safe area centered on the arena origin.

use serde::{Deserialize, Serialize};

use crate::engine::coordinates::Vec2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Zone {
    radius: f32,
}

impl Zone {
    pub fn new(radius: f32) -> Self {
        Self { radius: radius.max(0.0) }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Shrink by `rate * dt`, clamped at zero.
    pub fn shrink(&mut self, rate: f32, dt: f32) {
        self.radius = (self.radius - rate * dt).max(0.0);
    }

    /// A point is out of the zone iff its distance from the origin exceeds
    /// the current radius.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.norm() <= self.radius
    }

    /// Distance from a point to the zone edge; negative when outside.
    #[inline]
    pub fn distance_from_edge(&self, point: Vec2) -> f32 {
        self.radius - point.norm()
    }
}
