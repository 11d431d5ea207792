//! Hittable target model

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Stable handle of a target inside its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// A target as seen by hit resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec2,
    /// Collider radius added to the reticle's hit radius
    pub tolerance_radius: f32,
    /// Visible and collidable
    pub alive: bool,
    /// Mid death/respawn cycle
    pub busy: bool,
}

impl Target {
    pub fn new(id: TargetId, position: Vec2, tolerance_radius: f32) -> Self {
        Self {
            id,
            position,
            tolerance_radius,
            alive: true,
            busy: false,
        }
    }

    /// Alive and not already dying
    pub fn is_hittable(&self) -> bool {
        self.alive && !self.busy
    }

    /// Circle-circle overlap with a query centered at `point`
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        self.position.distance(point) <= radius + self.tolerance_radius
    }
}
