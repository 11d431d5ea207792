//! Motion filter: smoothed pitch + integrated yaw, with calibration offsets.
//!
//! Pitch arrives as an absolute angle and is smoothed directly. Yaw arrives
//! as an angular rate, so it passes a deadband, is integrated into an
//! accumulator, and the accumulator is smoothed with the same filter.
//!
//! Displayed aim:
//! - pitch = -(filtered_pitch - pitch_offset - mount_pitch_offset)
//! - yaw   =   filtered_yaw   - yaw_offset

use serde::Serialize;
use tracing::debug;

use crate::types::{lerp, SensorFrame};
use crate::{DEFAULT_SMOOTHING, DEFAULT_YAW_DEADBAND};

/// Filter tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Exponential smoothing in [0, 1]; higher = slower response
    pub smoothing: f32,
    /// Angular rates with a smaller magnitude are treated as zero
    pub yaw_deadband: f32,
    /// Physical mounting tilt of the sensor (degrees)
    pub mount_pitch_offset: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            yaw_deadband: DEFAULT_YAW_DEADBAND,
            mount_pitch_offset: 0.0,
        }
    }
}

/// Per-device filter state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FilterState {
    pub filtered_pitch: f32,
    pub filtered_yaw: f32,
    pub yaw_accumulator: f32,
    pub pitch_offset: f32,
    pub yaw_offset: f32,
}

/// Calibrated aim offset in filter units (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayAim {
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone)]
pub struct MotionFilter {
    config: FilterConfig,
    state: FilterState,
}

impl MotionFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            state: FilterState::default(),
        }
    }

    /// Advance one tick with the most recent sample
    pub fn step(&mut self, sample: &SensorFrame, dt: f32) {
        let alpha = 1.0 - self.config.smoothing;

        let rate = if sample.angular_rate_z.abs() < self.config.yaw_deadband {
            0.0
        } else {
            sample.angular_rate_z
        };
        self.state.yaw_accumulator -= rate * dt;

        self.state.filtered_pitch = lerp(self.state.filtered_pitch, sample.pitch, alpha);
        self.state.filtered_yaw = lerp(self.state.filtered_yaw, self.state.yaw_accumulator, alpha);
    }

    /// Make the current orientation the new zero reference
    pub fn calibrate(&mut self) {
        self.state.pitch_offset = self.state.filtered_pitch;
        self.state.yaw_offset = self.state.filtered_yaw;
        debug!(
            pitch_offset = self.state.pitch_offset,
            yaw_offset = self.state.yaw_offset,
            "calibrated"
        );
    }

    /// Offsets and mount correction applied; pitch sign inverted
    pub fn display(&self) -> DisplayAim {
        DisplayAim {
            pitch: -(self.state.filtered_pitch
                - self.state.pitch_offset
                - self.config.mount_pitch_offset),
            yaw: self.state.filtered_yaw - self.state.yaw_offset,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TriggerLevel;

    fn sample(pitch: f32, rate: f32) -> SensorFrame {
        SensorFrame {
            pitch,
            angular_rate_z: rate,
            trigger: TriggerLevel::Released,
        }
    }

    #[test]
    fn test_pitch_moves_toward_sample() {
        let mut filter = MotionFilter::new(FilterConfig::default());
        filter.step(&sample(10.0, 0.0), 0.016);
        // alpha = 0.05
        assert!((filter.state().filtered_pitch - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_smoothing_tracks_immediately() {
        let mut filter = MotionFilter::new(FilterConfig {
            smoothing: 0.0,
            ..FilterConfig::default()
        });
        filter.step(&sample(7.0, 0.0), 0.016);
        assert_eq!(filter.state().filtered_pitch, 7.0);
    }

    #[test]
    fn test_full_smoothing_never_moves() {
        let mut filter = MotionFilter::new(FilterConfig {
            smoothing: 1.0,
            ..FilterConfig::default()
        });
        for _ in 0..100 {
            filter.step(&sample(45.0, 50.0), 0.016);
        }
        assert_eq!(filter.state().filtered_pitch, 0.0);
        assert_eq!(filter.state().filtered_yaw, 0.0);
    }

    #[test]
    fn test_deadband_suppresses_drift() {
        let mut filter = MotionFilter::new(FilterConfig::default());
        for _ in 0..1000 {
            filter.step(&sample(0.0, 0.29), 0.016);
            filter.step(&sample(0.0, -0.29), 0.016);
        }
        assert_eq!(filter.state().yaw_accumulator, 0.0);
    }

    #[test]
    fn test_yaw_integrates_negated_rate() {
        let mut filter = MotionFilter::new(FilterConfig {
            smoothing: 0.0,
            ..FilterConfig::default()
        });
        filter.step(&sample(0.0, 10.0), 0.5);
        assert_eq!(filter.state().yaw_accumulator, -5.0);
        assert_eq!(filter.state().filtered_yaw, -5.0);
        assert_eq!(filter.display().yaw, -5.0);
    }

    #[test]
    fn test_pitch_sign_inverted() {
        let mut filter = MotionFilter::new(FilterConfig {
            smoothing: 0.0,
            ..FilterConfig::default()
        });
        filter.step(&sample(20.0, 0.0), 0.016);
        assert_eq!(filter.display().pitch, -20.0);
    }

    #[test]
    fn test_mount_offset_shifts_pitch() {
        let mut filter = MotionFilter::new(FilterConfig {
            smoothing: 0.0,
            mount_pitch_offset: 5.0,
            ..FilterConfig::default()
        });
        filter.step(&sample(20.0, 0.0), 0.016);
        assert_eq!(filter.display().pitch, -15.0);
    }

    #[test]
    fn test_calibration_zeroes_display() {
        let mut filter = MotionFilter::new(FilterConfig::default());
        for _ in 0..37 {
            filter.step(&sample(33.3, 12.0), 0.016);
        }
        filter.calibrate();
        let aim = filter.display();
        assert_eq!(aim.pitch, 0.0);
        assert_eq!(aim.yaw, 0.0);
    }

    #[test]
    fn test_calibration_is_idempotent() {
        let mut filter = MotionFilter::new(FilterConfig::default());
        for _ in 0..10 {
            filter.step(&sample(-8.0, 4.0), 0.016);
        }
        filter.calibrate();
        let first = *filter.state();
        filter.calibrate();
        filter.calibrate();
        assert_eq!(*filter.state(), first);
        assert_eq!(filter.display(), DisplayAim::default());
    }
}
