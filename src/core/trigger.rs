//! Trigger edge detection: fire once per press, never while held

use crate::types::TriggerLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerEdge {
    last: TriggerLevel,
}

impl TriggerEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current level; true exactly on a released → pressed transition
    pub fn update(&mut self, level: TriggerLevel) -> bool {
        let pulled = level.is_pressed() && !self.last.is_pressed();
        self.last = level;
        pulled
    }
}
