//! Presentation output published once per tick

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::types::{PlayerId, SessionState, Vec2, Winner};

/// Reticle position of one device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReticleOutput {
    pub player: PlayerId,
    pub position: Vec2,
    /// False while the device runs degraded (no transport)
    pub connected: bool,
}

/// Volumes of the two music channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMix {
    pub current_clip: Option<String>,
    pub current_volume: f32,
    pub next_clip: Option<String>,
    pub next_volume: f32,
    pub fading: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub timestamp: DateTime<Utc>,
    pub state: SessionState,
    pub scores: [u32; 2],
    /// `ceil(remaining seconds)`
    pub countdown: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_label: Option<String>,
    pub reticles: Vec<ReticleOutput>,
    pub audio: AudioMix,
}

impl SessionSnapshot {
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player.index()]
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.state.color_code();
        let reset = SessionState::color_reset();
        format!(
            "{}{} {} | P1={} P2={} | t={}s{}{}",
            color,
            self.state.emoji(),
            self.state,
            self.scores[0],
            self.scores[1],
            self.countdown,
            self.winner_suffix(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "state={} | p1={} | p2={} | countdown={}{}",
            self.state,
            self.scores[0],
            self.scores[1],
            self.countdown,
            self.winner_suffix()
        )
    }

    fn winner_suffix(&self) -> String {
        match &self.winner_label {
            Some(label) => format!(" | {}", label),
            None => String::new(),
        }
    }
}
