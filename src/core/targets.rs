//! Reference target registry: static targets with a timed respawn.
//!
//! A hit target goes down (not alive, busy) for `respawn_delay` seconds, then
//! comes back at the next spawn point in round-robin order. It never appears
//! in overlap queries while down.

use tracing::debug;

use crate::core::TargetRegistry;
use crate::types::{PlayerId, Target, TargetId, Vec2};

#[derive(Debug, Clone)]
struct Slot {
    target: Target,
    /// Seconds left until respawn while busy
    respawn_remaining: f32,
    last_hit_by: Option<PlayerId>,
}

#[derive(Debug, Clone)]
pub struct TargetField {
    slots: Vec<Slot>,
    spawn_points: Vec<Vec2>,
    next_spawn: usize,
    respawn_delay: f32,
}

impl TargetField {
    /// One target per spawn point; later respawns cycle through the same points
    pub fn new(spawn_points: Vec<Vec2>, tolerance_radius: f32, respawn_delay: f32) -> Self {
        let slots = spawn_points
            .iter()
            .enumerate()
            .map(|(i, &position)| Slot {
                target: Target::new(TargetId(i as u32), position, tolerance_radius),
                respawn_remaining: 0.0,
                last_hit_by: None,
            })
            .collect();

        Self {
            slots,
            spawn_points,
            next_spawn: 0,
            respawn_delay,
        }
    }

    /// Evenly spaced grid filling `cols × rows` cells of a centered area
    pub fn grid(
        cols: usize,
        rows: usize,
        half_width: f32,
        half_height: f32,
        tolerance_radius: f32,
        respawn_delay: f32,
    ) -> Self {
        let mut points = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let x = -half_width + (2.0 * half_width) * (col as f32 + 0.5) / cols as f32;
                let y = -half_height + (2.0 * half_height) * (row as f32 + 0.5) / rows as f32;
                points.push(Vec2::new(x, y));
            }
        }
        Self::new(points, tolerance_radius, respawn_delay)
    }

    /// Advance respawn timers
    pub fn tick(&mut self, dt: f32) {
        for i in 0..self.slots.len() {
            if !self.slots[i].target.busy {
                continue;
            }
            self.slots[i].respawn_remaining -= dt;
            if self.slots[i].respawn_remaining <= 0.0 {
                let position = self.take_spawn_point();
                let slot = &mut self.slots[i];
                slot.respawn_remaining = 0.0;
                slot.target.position = position;
                slot.target.alive = true;
                slot.target.busy = false;
                debug!(id = %slot.target.id, x = position.x, y = position.y, "target respawned");
            }
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.slots.iter().map(|s| &s.target)
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.slots.get(id.0 as usize).map(|s| &s.target)
    }

    pub fn last_hit_by(&self, id: TargetId) -> Option<PlayerId> {
        self.slots.get(id.0 as usize).and_then(|s| s.last_hit_by)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn take_spawn_point(&mut self) -> Vec2 {
        if self.spawn_points.is_empty() {
            return Vec2::ZERO;
        }
        let point = self.spawn_points[self.next_spawn % self.spawn_points.len()];
        self.next_spawn = (self.next_spawn + 1) % self.spawn_points.len();
        point
    }
}

impl TargetRegistry for TargetField {
    fn overlapping(&self, position: Vec2, radius: f32) -> Vec<TargetId> {
        self.slots
            .iter()
            .map(|s| &s.target)
            .filter(|t| t.is_hittable() && t.overlaps(position, radius))
            .map(|t| t.id)
            .collect()
    }

    fn notify_hit(&mut self, target: TargetId, player: PlayerId) {
        let delay = self.respawn_delay;
        let Some(slot) = self.slots.get_mut(target.0 as usize) else {
            return;
        };
        // Already going down; the first hit owns the cycle
        if !slot.target.is_hittable() {
            return;
        }
        slot.target.alive = false;
        slot.target.busy = true;
        slot.respawn_remaining = delay;
        slot.last_hit_by = Some(player);
    }

    fn advance(&mut self, dt: f32) {
        self.tick(dt);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> TargetField {
        TargetField::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(0.2, 0.0), Vec2::new(5.0, 5.0)],
            0.4,
            0.5,
        )
    }

    #[test]
    fn test_overlap_uses_both_radii() {
        let field = field();
        assert_eq!(field.overlapping(Vec2::new(5.5, 5.0), 0.15), vec![TargetId(2)]);
        assert!(field.overlapping(Vec2::new(5.6, 5.0), 0.15).is_empty());
    }

    #[test]
    fn test_overlap_in_registry_order() {
        let field = field();
        assert_eq!(
            field.overlapping(Vec2::new(0.1, 0.0), 0.15),
            vec![TargetId(0), TargetId(1)]
        );
    }

    #[test]
    fn test_hit_target_leaves_hittable_set_until_respawn() {
        let mut field = field();
        field.notify_hit(TargetId(2), PlayerId::One);

        let target = field.get(TargetId(2)).unwrap();
        assert!(!target.alive);
        assert!(target.busy);
        assert!(field.overlapping(Vec2::new(5.0, 5.0), 0.15).is_empty());

        field.tick(0.3);
        assert!(field.get(TargetId(2)).unwrap().busy);

        field.tick(0.3);
        let target = field.get(TargetId(2)).unwrap();
        assert!(target.is_hittable());
        // first spawn point in the rotation
        assert_eq!(target.position, Vec2::new(0.0, 0.0));
        assert_eq!(field.last_hit_by(TargetId(2)), Some(PlayerId::One));
    }

    #[test]
    fn test_second_hit_while_down_ignored() {
        let mut field = field();
        field.notify_hit(TargetId(0), PlayerId::One);
        field.tick(0.4);
        field.notify_hit(TargetId(0), PlayerId::Two);
        assert_eq!(field.last_hit_by(TargetId(0)), Some(PlayerId::One));
        field.tick(0.2);
        assert!(field.get(TargetId(0)).unwrap().is_hittable());
    }

    #[test]
    fn test_grid_layout() {
        let field = TargetField::grid(2, 1, 4.0, 2.0, 0.4, 0.5);
        let positions: Vec<Vec2> = field.targets().map(|t| t.position).collect();
        assert_eq!(positions, vec![Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0)]);
    }
}
