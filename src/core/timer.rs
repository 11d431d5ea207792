//! Session countdown timer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Stopped,
    Running,
}

#[derive(Debug, Clone)]
pub struct SessionTimer {
    state: TimerState,
    remaining: f32,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Stopped,
            remaining: 0.0,
        }
    }

    pub fn start(&mut self, duration: f32) {
        self.remaining = duration;
        self.state = TimerState::Running;
    }

    /// Halt without signalling expiry
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Advance the countdown; true only on the tick it expires
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.state != TimerState::Running {
            return false;
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.state = TimerState::Stopped;
            return true;
        }
        false
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whole seconds for display, rounded up
    pub fn display_seconds(&self) -> i32 {
        self.remaining.ceil() as i32
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_stopped() {
        let mut timer = SessionTimer::new();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert!(!timer.tick(1.0));
    }

    #[test]
    fn test_display_rounds_up() {
        let mut timer = SessionTimer::new();
        timer.start(60.0);
        assert_eq!(timer.display_seconds(), 60);
        timer.tick(0.25);
        assert_eq!(timer.display_seconds(), 60);
        timer.tick(1.0);
        assert_eq!(timer.display_seconds(), 59);
    }

    #[test]
    fn test_expires_exactly_once() {
        let mut timer = SessionTimer::new();
        timer.start(1.0);
        let expiries = (0..200).filter(|_| timer.tick(0.016)).count();
        assert_eq!(expiries, 1);
        assert_eq!(timer.remaining(), 0.0);
        assert_eq!(timer.display_seconds(), 0);
        assert_eq!(timer.state(), TimerState::Stopped);
    }

    #[test]
    fn test_overshoot_clamps_to_zero() {
        let mut timer = SessionTimer::new();
        timer.start(0.5);
        assert!(timer.tick(3.0));
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn test_stop_does_not_expire() {
        let mut timer = SessionTimer::new();
        timer.start(5.0);
        timer.tick(1.0);
        timer.stop();
        assert!(!timer.tick(10.0));
        assert_eq!(timer.remaining(), 4.0);
    }

    #[test]
    fn test_restart_after_expiry() {
        let mut timer = SessionTimer::new();
        timer.start(0.1);
        assert!(timer.tick(0.2));
        timer.start(0.1);
        assert!(timer.is_running());
        assert!(timer.tick(0.2));
    }
}
