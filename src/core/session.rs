//! Game session controller: scores + Idle/Gameplay/GameOver state machine
//!
//! State transitions:
//! - IDLE → GAMEPLAY: `start()` (scores reset, gameplay music, timer started)
//! - GAMEPLAY → GAME_OVER: timer expiry only (idle music, winner decided)
//! - GAME_OVER → IDLE: `return_to_idle()` (scores kept on display)

use tracing::{debug, info, warn};

use crate::core::{CrossfadeScheduler, SessionTimer};
use crate::error::SessionError;
use crate::types::{AudioMix, PlayerId, SessionState, Winner};
use crate::{DEFAULT_CROSSFADE_DURATION_SECS, DEFAULT_SESSION_DURATION_SECS};

/// Controller tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub session_duration: f32,
    pub crossfade_duration: f32,
    pub idle_clip: String,
    pub gameplay_clip: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_duration: DEFAULT_SESSION_DURATION_SECS,
            crossfade_duration: DEFAULT_CROSSFADE_DURATION_SECS,
            idle_clip: "idle".to_string(),
            gameplay_clip: "gameplay".to_string(),
        }
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    ScoreChanged { player: PlayerId, score: u32 },
    GameOver { winner: Winner },
    ReturnedToIdle,
}

/// Session state machine engine
#[derive(Debug)]
pub struct GameSession {
    /// Current state
    state: SessionState,
    scores: [u32; 2],
    timer: SessionTimer,
    audio: CrossfadeScheduler,
    settings: SessionSettings,
    /// Rounds started since construction
    rounds: u64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl GameSession {
    /// Create controller in IDLE with the idle music fading in
    pub fn new(settings: SessionSettings) -> Self {
        let mut audio = CrossfadeScheduler::new(settings.crossfade_duration);
        audio.start_transition(settings.idle_clip.clone());

        Self {
            state: SessionState::Idle,
            scores: [0, 0],
            timer: SessionTimer::new(),
            audio,
            settings,
            rounds: 0,
        }
    }

    /// IDLE → GAMEPLAY
    pub fn start(&mut self) -> Result<SessionEvent, SessionError> {
        if self.state != SessionState::Idle {
            warn!(state = %self.state, "start ignored");
            return Err(SessionError::InvalidTransition {
                action: "start a round",
                state: self.state,
            });
        }

        self.scores = [0, 0];
        self.rounds += 1;
        self.enter(SessionState::Gameplay);
        self.audio.start_transition(self.settings.gameplay_clip.clone());
        self.timer.start(self.settings.session_duration);

        info!(round = self.rounds, duration = self.settings.session_duration, "round started");
        Ok(SessionEvent::Started)
    }

    /// GAME_OVER → IDLE
    pub fn return_to_idle(&mut self) -> Result<SessionEvent, SessionError> {
        if self.state != SessionState::GameOver {
            return Err(SessionError::InvalidTransition {
                action: "return to idle",
                state: self.state,
            });
        }

        self.enter(SessionState::Idle);
        Ok(SessionEvent::ReturnedToIdle)
    }

    /// Add points to a player; only accepted during GAMEPLAY
    pub fn add(&mut self, player: PlayerId, delta: u32) -> Result<SessionEvent, SessionError> {
        if self.state != SessionState::Gameplay {
            debug!(%player, delta, state = %self.state, "score ignored outside gameplay");
            return Err(SessionError::InvalidTransition {
                action: "score",
                state: self.state,
            });
        }

        let slot = &mut self.scores[player.index()];
        *slot = slot.saturating_add(delta);
        let score = *slot;
        info!(%player, score, p1 = self.scores[0], p2 = self.scores[1], "score");
        Ok(SessionEvent::ScoreChanged { player, score })
    }

    /// Advance timer then audio; reports GAME_OVER on the expiry tick
    pub fn tick(&mut self, dt: f32) -> Option<SessionEvent> {
        let mut event = None;
        if self.timer.tick(dt) && self.state == SessionState::Gameplay {
            event = Some(self.end_game());
        }
        self.audio.tick(dt);
        event
    }

    /// GAMEPLAY → GAME_OVER
    fn end_game(&mut self) -> SessionEvent {
        self.enter(SessionState::GameOver);
        self.audio.start_transition(self.settings.idle_clip.clone());

        let winner = self.winner();
        info!(
            p1 = self.scores[0],
            p2 = self.scores[1],
            winner = winner.label(),
            "round over"
        );
        SessionEvent::GameOver { winner }
    }

    fn enter(&mut self, state: SessionState) {
        debug!(from = %self.state, to = %state, "session transition");
        self.state = state;
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player.index()]
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    /// Strict comparison of the current scores
    pub fn winner(&self) -> Winner {
        Winner::from_scores(self.scores[0], self.scores[1])
    }

    /// Banner text, only once the round is over
    pub fn winner_label(&self) -> Option<&'static str> {
        (self.state == SessionState::GameOver).then(|| self.winner().label())
    }

    pub fn countdown(&self) -> i32 {
        self.timer.display_seconds()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn audio(&self) -> &CrossfadeScheduler {
        &self.audio
    }

    pub fn audio_mix(&self) -> AudioMix {
        self.audio.mix()
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }
}

// =============================================================================
// TESTS
// =============================================================================
