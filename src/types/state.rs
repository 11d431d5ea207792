//! Session state definitions

use serde::{Deserialize, Serialize};

/// The three phases of a blaster session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Attract mode, idle music, last scores on display
    Idle,
    /// Round in progress, countdown running, hits score
    Gameplay,
    /// Round over, winner on display
    GameOver,
}

impl SessionState {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            SessionState::Idle => "\x1b[90m",     // Gray
            SessionState::Gameplay => "\x1b[32m", // Green
            SessionState::GameOver => "\x1b[33m", // Yellow
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for state
    pub fn emoji(&self) -> &'static str {
        match self {
            SessionState::Idle => "⏸",
            SessionState::Gameplay => "🎯",
            SessionState::GameOver => "🏁",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "IDLE",
            SessionState::Gameplay => "GAMEPLAY",
            SessionState::GameOver => "GAME_OVER",
        };
        write!(f, "{}", name)
    }
}
