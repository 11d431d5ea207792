//! Hit resolution against a target registry
//!
//! The registry is an external collaborator: it answers overlap queries with
//! live, non-busy targets and owns each target's death/respawn cycle.

use tracing::{debug, info};

use crate::types::{PlayerId, TargetId, Vec2};
use crate::DEFAULT_HIT_RADIUS;

/// Capability the hit resolver needs from whatever owns the targets
pub trait TargetRegistry {
    /// Live, non-busy targets overlapping the circle, in a stable order
    fn overlapping(&self, position: Vec2, radius: f32) -> Vec<TargetId>;

    /// Start the target's death/respawn cycle
    fn notify_hit(&mut self, target: TargetId, player: PlayerId);

    /// Advance death/respawn timers
    fn advance(&mut self, _dt: f32) {}
}

/// Outcome of one trigger pull that connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub player: PlayerId,
    pub target: TargetId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResolver {
    radius: f32,
}

impl Default for HitResolver {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_RADIUS)
    }
}

impl HitResolver {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Resolve one pull: notify at most one target, the first the registry lists
    pub fn fire<R: TargetRegistry + ?Sized>(
        &self,
        reticle: Vec2,
        player: PlayerId,
        registry: &mut R,
    ) -> Option<Hit> {
        let candidates = registry.overlapping(reticle, self.radius);
        let Some(&target) = candidates.first() else {
            debug!(%player, x = reticle.x, y = reticle.y, "shot missed");
            return None;
        };

        registry.notify_hit(target, player);
        info!(%player, target_id = %target, "target hit");
        Some(Hit { player, target })
    }
}

// =============================================================================
// TESTS
// =============================================================================
