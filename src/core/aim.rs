//! Aim mapper: filtered aim → clamped reticle position

use crate::core::DisplayAim;
use crate::types::{Rect, Vec2};
use crate::{DEFAULT_MOVE_SCALE, DEFAULT_RETICLE_MARGIN};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimMapper {
    move_scale: f32,
    margin: f32,
}

impl Default for AimMapper {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_SCALE, DEFAULT_RETICLE_MARGIN)
    }
}

impl AimMapper {
    pub fn new(move_scale: f32, margin: f32) -> Self {
        Self { move_scale, margin }
    }

    /// Scale and clamp into `[min + margin, max - margin]` on both axes
    pub fn map(&self, aim: DisplayAim, bounds: Rect) -> Vec2 {
        Vec2::new(
            clamp_axis(aim.yaw * self.move_scale, bounds.min.x, bounds.max.x, self.margin),
            clamp_axis(aim.pitch * self.move_scale, bounds.min.y, bounds.max.y, self.margin),
        )
    }
}

/// Clamp with margin; an axis narrower than two margins collapses to its center
fn clamp_axis(value: f32, min: f32, max: f32, margin: f32) -> f32 {
    let lo = min + margin;
    let hi = max - margin;
    if lo > hi || value.is_nan() {
        return (min + max) * 0.5;
    }
    value.clamp(lo, hi)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Rect {
        Rect::centered(8.0, 5.0)
    }

    #[test]
    fn test_scales_inside_bounds() {
        let mapper = AimMapper::new(0.01, 0.5);
        let pos = mapper.map(DisplayAim { yaw: 100.0, pitch: -200.0 }, view());
        assert!((pos.x - 1.0).abs() < 1e-6);
        assert!((pos.y + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_extreme_input_stays_within_margin() {
        let mapper = AimMapper::new(0.01, 0.5);
        for &(yaw, pitch) in &[
            (f32::MAX, f32::MAX),
            (f32::MIN, f32::MIN),
            (f32::INFINITY, f32::NEG_INFINITY),
            (1e9, -1e9),
            (f32::NAN, 3.0),
        ] {
            let pos = mapper.map(DisplayAim { yaw, pitch }, view());
            assert!(pos.x >= -7.5 && pos.x <= 7.5, "x={} for yaw={}", pos.x, yaw);
            assert!(pos.y >= -4.5 && pos.y <= 4.5, "y={} for pitch={}", pos.y, pitch);
        }
    }

    #[test]
    fn test_clamps_to_exact_margin() {
        let mapper = AimMapper::new(1.0, 0.5);
        let pos = mapper.map(DisplayAim { yaw: 100.0, pitch: -100.0 }, view());
        assert_eq!(pos, Vec2::new(7.5, -4.5));
    }

    #[test]
    fn test_offset_bounds() {
        let mapper = AimMapper::new(1.0, 1.0);
        let bounds = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(14.0, 30.0));
        let pos = mapper.map(DisplayAim { yaw: 0.0, pitch: 0.0 }, bounds);
        assert_eq!(pos, Vec2::new(11.0, 21.0));
    }

    #[test]
    fn test_tiny_area_collapses_to_center() {
        let mapper = AimMapper::new(1.0, 0.5);
        let bounds = Rect::centered(0.25, 5.0);
        let pos = mapper.map(DisplayAim { yaw: 3.0, pitch: 0.0 }, bounds);
        assert_eq!(pos.x, 0.0);
    }
}
