//! One handheld blaster: transport → parser → filter → aim, plus trigger edges
//!
//! Per tick:
//! 1. drain ready lines, folding each into the held frame and edge-detecting
//!    the trigger on every fold
//! 2. step the filter once with the held frame (only while connected)
//! 3. apply a pending calibration
//! 4. map to a clamped reticle position
//!
//! Without a transport the device is degraded: no frames, no pulls, and the
//! reticle stays where it was.

use tracing::{debug, info, trace, warn};

use crate::core::{
    AimMapper, DisplayAim, FilterConfig, LineSource, MotionFilter, SensorLineParser, TriggerEdge,
};
use crate::types::{PlayerId, Rect, ReticleOutput, SensorFrame, Vec2};
use crate::MAX_LINES_PER_TICK;

/// What happened on one device during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceTick {
    /// Lines folded into the held frame
    pub frames: usize,
    /// Lines dropped as malformed
    pub dropped: usize,
    /// Rising trigger edges seen this tick
    pub pulls: usize,
    pub reticle: Vec2,
}

pub struct BlasterDevice {
    player: PlayerId,
    transport: Option<Box<dyn LineSource>>,
    parser: SensorLineParser,
    filter: MotionFilter,
    aim: AimMapper,
    trigger: TriggerEdge,
    frame: SensorFrame,
    reticle: Vec2,
    calibration_pending: bool,
    frames_total: u64,
}

impl std::fmt::Debug for BlasterDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlasterDevice")
            .field("player", &self.player)
            .field("transport", &self.transport.as_ref().map(|t| t.describe()))
            .field("frame", &self.frame)
            .field("reticle", &self.reticle)
            .finish()
    }
}

impl BlasterDevice {
    pub fn new(
        player: PlayerId,
        transport: Option<Box<dyn LineSource>>,
        filter: FilterConfig,
        aim: AimMapper,
    ) -> Self {
        match &transport {
            Some(t) => info!(%player, source = %t.describe(), "device attached"),
            None => warn!(%player, "no transport, running degraded"),
        }

        Self {
            player,
            transport,
            parser: SensorLineParser::new(),
            filter: MotionFilter::new(filter),
            aim,
            trigger: TriggerEdge::new(),
            frame: SensorFrame::default(),
            reticle: Vec2::ZERO,
            calibration_pending: false,
            frames_total: 0,
        }
    }

    /// Device without a transport; reticle frozen at the origin
    pub fn disconnected(player: PlayerId, filter: FilterConfig, aim: AimMapper) -> Self {
        Self::new(player, None, filter, aim)
    }

    /// Calibrate after this tick's filter step
    pub fn request_calibration(&mut self) {
        self.calibration_pending = true;
    }

    /// Calibrate immediately against the current filter state
    pub fn calibrate(&mut self) {
        self.filter.calibrate();
        self.calibration_pending = false;
        info!(
            player = %self.player,
            pitch_offset = self.filter.state().pitch_offset,
            yaw_offset = self.filter.state().yaw_offset,
            "calibrated"
        );
    }

    pub fn tick(&mut self, dt: f32, bounds: Rect) -> DeviceTick {
        let mut report = DeviceTick::default();

        for line in self.poll_lines() {
            match self.parser.parse(&line) {
                Some(update) => {
                    self.frame.apply(update);
                    report.frames += 1;
                    if self.trigger.update(self.frame.trigger) {
                        debug!(player = %self.player, "trigger pulled");
                        report.pulls += 1;
                    }
                }
                None => {
                    trace!(player = %self.player, line = %line, "malformed line dropped");
                    report.dropped += 1;
                }
            }
        }
        self.frames_total += report.frames as u64;

        if self.is_connected() {
            self.filter.step(&self.frame, dt);
        }
        if self.calibration_pending {
            self.calibrate();
        }
        if self.is_connected() {
            self.reticle = self.aim.map(self.filter.display(), bounds);
        }

        report.reticle = self.reticle;
        report
    }

    fn poll_lines(&mut self) -> Vec<String> {
        let Some(transport) = self.transport.as_mut() else {
            return Vec::new();
        };

        match transport.poll(MAX_LINES_PER_TICK) {
            Ok(lines) => lines,
            Err(e) if e.is_fatal() => {
                warn!(
                    player = %self.player,
                    source = %transport.describe(),
                    error = %e,
                    "transport lost, running degraded"
                );
                self.transport = None;
                Vec::new()
            }
            Err(e) => {
                trace!(player = %self.player, error = %e, "transient read error");
                Vec::new()
            }
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn reticle(&self) -> Vec2 {
        self.reticle
    }

    pub fn display_aim(&self) -> DisplayAim {
        self.filter.display()
    }

    pub fn filter(&self) -> &MotionFilter {
        &self.filter
    }

    pub fn frame(&self) -> &SensorFrame {
        &self.frame
    }

    pub fn frames_total(&self) -> u64 {
        self.frames_total
    }

    pub fn output(&self) -> ReticleOutput {
        ReticleOutput {
            player: self.player,
            position: self.reticle,
            connected: self.is_connected(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ScriptedFeed, ScriptedLineSource};

    fn bounds() -> Rect {
        Rect::centered(8.0, 5.0)
    }

    fn scripted(filter: FilterConfig) -> (BlasterDevice, ScriptedFeed) {
        let (source, feed) = ScriptedLineSource::new();
        let device = BlasterDevice::new(
            PlayerId::One,
            Some(Box::new(source)),
            filter,
            AimMapper::new(0.01, 0.5),
        );
        (device, feed)
    }

    #[test]
    fn test_bad_line_keeps_previous_values() {
        let (mut device, feed) = scripted(FilterConfig::default());
        feed.push_line("10,0,5,0");
        device.tick(0.016, bounds());
        feed.push_line("oops");
        feed.push_line("x,0,7,0");
        let report = device.tick(0.016, bounds());

        assert_eq!(report.frames, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(device.frame().pitch, 10.0);
        assert_eq!(device.frame().angular_rate_z, 7.0);
    }

    #[test]
    fn test_pulls_counted_per_line_within_tick() {
        let (mut device, feed) = scripted(FilterConfig::default());
        for raw in ["0", "1", "1", "1", "0", "1"] {
            feed.push_line(format!("0,0,0,{}", raw));
        }
        let report = device.tick(0.016, bounds());
        assert_eq!(report.pulls, 2);
    }

    #[test]
    fn test_held_trigger_across_ticks_fires_once() {
        let (mut device, feed) = scripted(FilterConfig::default());
        let mut pulls = 0;
        for _ in 0..10 {
            feed.push_line("0,0,0,1");
            pulls += device.tick(0.016, bounds()).pulls;
        }
        // no new line: held level, no edge
        pulls += device.tick(0.016, bounds()).pulls;
        assert_eq!(pulls, 1);
    }

    #[test]
    fn test_calibration_request_zeroes_reticle() {
        let (mut device, feed) = scripted(FilterConfig::default());
        for _ in 0..20 {
            feed.push_line("30,0,25,0");
            device.tick(0.016, bounds());
        }
        assert_ne!(device.reticle(), Vec2::ZERO);

        device.request_calibration();
        let report = device.tick(0.016, bounds());
        assert_eq!(report.reticle, Vec2::ZERO);
        assert_eq!(device.display_aim(), DisplayAim::default());
    }

    #[test]
    fn test_degraded_device_freezes() {
        let (mut device, feed) = scripted(FilterConfig {
            smoothing: 0.0,
            ..FilterConfig::default()
        });
        feed.push_line("-100,0,0,0");
        let before = device.tick(0.016, bounds()).reticle;
        assert_eq!(before, Vec2::new(0.0, 1.0));

        feed.unplug();
        device.tick(0.016, bounds());
        assert!(!device.is_connected());

        for _ in 0..10 {
            let report = device.tick(0.016, bounds());
            assert_eq!(report.reticle, before);
            assert_eq!(report.pulls, 0);
        }
    }

    #[test]
    fn test_disconnected_device_stays_at_origin() {
        let mut device = BlasterDevice::disconnected(
            PlayerId::Two,
            FilterConfig::default(),
            AimMapper::default(),
        );
        let report = device.tick(0.016, bounds());
        assert_eq!(report, DeviceTick::default());
        assert!(!device.output().connected);
    }
}
