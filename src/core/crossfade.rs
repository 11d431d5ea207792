//! Audio crossfade scheduler.
//!
//! Two channels: "current" (outgoing) and "next" (incoming). A transition
//! ramps current from its volume at transition start down to 0 while next
//! ramps up to 1, then pins both, stops the silent channel and swaps roles.
//!
//! Restarting mid-fade resets elapsed time and ramps both channels from
//! their live volumes. Asking for the clip that is currently fading out
//! reverses the fade instead of rebinding it.

use tracing::debug;

use crate::types::{lerp, AudioMix};
use crate::DEFAULT_CROSSFADE_DURATION_SECS;

/// One playback channel
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChannel {
    pub clip: Option<String>,
    pub volume: f32,
    pub playing: bool,
}

impl AudioChannel {
    fn silent(volume: f32) -> Self {
        Self {
            clip: None,
            volume,
            playing: false,
        }
    }

    fn stop(&mut self) {
        self.playing = false;
        self.clip = None;
    }
}

#[derive(Debug, Clone)]
pub struct CrossfadeScheduler {
    channels: [AudioChannel; 2],
    current: usize,
    duration: f32,
    elapsed: f32,
    /// Volume of the outgoing channel when the running fade started
    start_volume: f32,
    /// Volume of the incoming channel when the running fade started
    next_start_volume: f32,
    fading: bool,
}

impl Default for CrossfadeScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CROSSFADE_DURATION_SECS)
    }
}

impl CrossfadeScheduler {
    pub fn new(duration: f32) -> Self {
        Self {
            channels: [AudioChannel::silent(1.0), AudioChannel::silent(0.0)],
            current: 0,
            duration,
            elapsed: 0.0,
            start_volume: 1.0,
            next_start_volume: 0.0,
            fading: false,
        }
    }

    /// Begin fading to `clip`, cancelling any fade in flight
    pub fn start_transition(&mut self, clip: impl Into<String>) {
        let clip = clip.into();
        let on_current = self.current().clip.as_deref() == Some(clip.as_str());

        if !self.fading && on_current {
            return;
        }

        if self.fading {
            debug!(
                clip = %clip,
                elapsed = self.elapsed,
                reverse = on_current,
                "crossfade restarted mid-flight"
            );
            if on_current {
                self.current = 1 - self.current;
            }
        }

        self.elapsed = 0.0;
        self.start_volume = self.channels[self.current].volume;

        let next = &mut self.channels[1 - self.current];
        self.next_start_volume = next.volume;
        next.clip = Some(clip);
        next.playing = true;
        self.fading = true;
    }

    /// Advance the ramp; true on the tick the fade completes
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.fading {
            return false;
        }

        let t = if self.duration > 0.0 {
            self.elapsed += dt;
            self.elapsed / self.duration
        } else {
            1.0
        };

        let (cur, next) = (self.current, 1 - self.current);
        self.channels[cur].volume = lerp(self.start_volume, 0.0, t);
        self.channels[next].volume = lerp(self.next_start_volume, 1.0, t);

        if t < 1.0 {
            return false;
        }

        self.channels[cur].volume = 0.0;
        self.channels[next].volume = 1.0;
        self.channels[cur].stop();
        self.current = next;
        self.fading = false;
        debug!(clip = ?self.channels[next].clip, "crossfade complete");
        true
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }

    pub fn current(&self) -> &AudioChannel {
        &self.channels[self.current]
    }

    pub fn next(&self) -> &AudioChannel {
        &self.channels[1 - self.current]
    }

    pub fn mix(&self) -> AudioMix {
        let current = self.current();
        let next = self.next();
        AudioMix {
            current_clip: current.clip.clone(),
            current_volume: current.volume,
            next_clip: next.clip.clone(),
            next_volume: next.volume,
            fading: self.fading,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_volumes_sum_to_one_during_fade() {
        let mut fade = CrossfadeScheduler::new(1.0);
        fade.start_transition("idle");
        while !fade.tick(0.013) {
            let sum = fade.current().volume + fade.next().volume;
            assert!((sum - 1.0).abs() < EPS, "sum={}", sum);
        }
    }

    #[test]
    fn test_completion_pins_and_swaps() {
        let mut fade = CrossfadeScheduler::new(0.5);
        fade.start_transition("idle");
        let mut ticks = 0;
        while !fade.tick(0.1) {
            ticks += 1;
        }
        assert!(ticks >= 3 && ticks <= 5);

        assert_eq!(fade.current().volume, 1.0);
        assert_eq!(fade.next().volume, 0.0);
        assert_eq!(fade.current().clip.as_deref(), Some("idle"));
        assert!(fade.current().playing);
        assert!(!fade.next().playing);
        assert!(!fade.is_fading());
    }

    #[test]
    fn test_tick_after_completion_is_noop() {
        let mut fade = CrossfadeScheduler::new(0.2);
        fade.start_transition("idle");
        while !fade.tick(0.05) {}
        let mix = fade.mix();
        for _ in 0..10 {
            assert!(!fade.tick(0.05));
        }
        assert_eq!(fade.mix(), mix);
    }

    #[test]
    fn test_back_to_back_transitions() {
        let mut fade = CrossfadeScheduler::new(0.2);
        fade.start_transition("idle");
        while !fade.tick(0.05) {}
        fade.start_transition("gameplay");
        while !fade.tick(0.05) {}

        assert_eq!(fade.current().clip.as_deref(), Some("gameplay"));
        assert_eq!(fade.current().volume, 1.0);
        assert_eq!(fade.next().volume, 0.0);
        assert!(fade.next().clip.is_none());
    }

    /// Runs an idle fade to completion, then 0.4s of a 1s fade to gameplay
    fn gameplay_fade_in_flight() -> CrossfadeScheduler {
        let mut fade = CrossfadeScheduler::new(1.0);
        fade.start_transition("idle");
        while !fade.tick(0.1) {}

        fade.start_transition("gameplay");
        for _ in 0..4 {
            fade.tick(0.1);
        }
        assert!((fade.current().volume - 0.6).abs() < EPS);
        assert!((fade.next().volume - 0.4).abs() < EPS);
        fade
    }

    #[test]
    fn test_restart_to_outgoing_clip_reverses() {
        let mut fade = gameplay_fade_in_flight();

        fade.start_transition("idle");
        assert_eq!(fade.current().clip.as_deref(), Some("gameplay"));
        assert_eq!(fade.next().clip.as_deref(), Some("idle"));
        assert!((fade.current().volume - 0.4).abs() < EPS);
        assert!((fade.next().volume - 0.6).abs() < EPS);

        fade.tick(0.5);
        assert!((fade.current().volume - 0.2).abs() < EPS);
        assert!((fade.next().volume - 0.8).abs() < EPS);

        while !fade.tick(0.1) {}
        assert_eq!(fade.current().volume, 1.0);
        assert_eq!(fade.next().volume, 0.0);
        assert_eq!(fade.current().clip.as_deref(), Some("idle"));
        assert!(fade.next().clip.is_none());
    }

    #[test]
    fn test_restart_to_new_clip_ramps_from_live_volumes() {
        let mut fade = gameplay_fade_in_flight();

        fade.start_transition("menu");
        assert_eq!(fade.current().clip.as_deref(), Some("idle"));
        assert_eq!(fade.next().clip.as_deref(), Some("menu"));

        fade.tick(0.5);
        assert!((fade.current().volume - 0.3).abs() < EPS);
        assert!((fade.next().volume - 0.7).abs() < EPS);

        while !fade.tick(0.1) {}
        assert_eq!(fade.current().clip.as_deref(), Some("menu"));
        assert_eq!(fade.current().volume, 1.0);
    }

    #[test]
    fn test_transition_to_playing_clip_is_noop() {
        let mut fade = CrossfadeScheduler::new(0.2);
        fade.start_transition("idle");
        while !fade.tick(0.05) {}
        let mix = fade.mix();

        fade.start_transition("idle");
        assert!(!fade.is_fading());
        assert_eq!(fade.mix(), mix);
    }

    #[test]
    fn test_zero_duration_completes_next_tick() {
        let mut fade = CrossfadeScheduler::new(0.0);
        fade.start_transition("idle");
        assert!(fade.is_fading());
        assert!(fade.tick(0.016));
        assert_eq!(fade.current().volume, 1.0);
    }
}
