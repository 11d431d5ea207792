//! Player identity and round outcome

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// One of the two fixed player slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// 1-based player number
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// 0-based slot for per-player arrays
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = SessionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(SessionError::UnknownPlayer(other)),
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// Result of strict score comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player(PlayerId),
    Tie,
}

impl Winner {
    /// Compare final scores; higher wins, equal ties
    pub fn from_scores(p1: u32, p2: u32) -> Self {
        if p1 > p2 {
            Winner::Player(PlayerId::One)
        } else if p2 > p1 {
            Winner::Player(PlayerId::Two)
        } else {
            Winner::Tie
        }
    }

    /// 1 or 2 for a winning player, 0 for a tie
    pub fn code(self) -> u8 {
        match self {
            Winner::Player(id) => id.number(),
            Winner::Tie => 0,
        }
    }

    /// Game-over banner text
    pub fn label(self) -> &'static str {
        match self {
            Winner::Player(PlayerId::One) => "Player 1 Wins!",
            Winner::Player(PlayerId::Two) => "Player 2 Wins!",
            Winner::Tie => "Players Tie!",
        }
    }
}
