//! Game context: the one object the tick loop owns.
//!
//! Holds both devices, the target registry and the session controller, and
//! enforces the per-tick order: input → aim/hits → target timers → session
//! timer → audio. A hit in this tick is scored before the session ticks, so
//! the same tick's audio update already reflects it.

use chrono::Utc;
use tracing::debug;

use crate::config::{GameConfig, PlayAreaConfig};
use crate::core::{
    AimMapper, BlasterDevice, Command, GameSession, Hit, HitResolver, LineSource, SessionEvent,
    SessionSettings, TargetField, TargetRegistry,
};
use crate::error::SessionError;
use crate::types::{PlayerId, Rect, SessionSnapshot};
use crate::{TARGET_GRID_COLUMNS, TARGET_GRID_FILL_X, TARGET_GRID_FILL_Y, TARGET_GRID_ROWS};

/// Everything that happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub hits: Vec<Hit>,
    pub events: Vec<SessionEvent>,
    pub pulls: usize,
}

#[derive(Debug)]
pub struct GameContext<R: TargetRegistry = TargetField> {
    devices: [BlasterDevice; 2],
    registry: R,
    resolver: HitResolver,
    session: GameSession,
    bounds: Rect,
}

impl GameContext<TargetField> {
    /// Build from configuration with a default target grid
    pub fn from_config(config: &GameConfig, transports: [Option<Box<dyn LineSource>>; 2]) -> Self {
        let area = config.play_area;
        let targets = TargetField::grid(
            TARGET_GRID_COLUMNS,
            TARGET_GRID_ROWS,
            area.half_width * TARGET_GRID_FILL_X,
            area.half_height * TARGET_GRID_FILL_Y,
            config.target_radius,
            config.respawn_delay_secs,
        );
        Self::with_registry(config, transports, targets)
    }
}

impl<R: TargetRegistry> GameContext<R> {
    pub fn with_registry(
        config: &GameConfig,
        transports: [Option<Box<dyn LineSource>>; 2],
        registry: R,
    ) -> Self {
        let [t1, t2] = transports;
        let aim = AimMapper::new(config.move_scale, config.reticle_margin);
        let filter = config.filter_config();

        Self {
            devices: [
                BlasterDevice::new(PlayerId::One, t1, filter, aim),
                BlasterDevice::new(PlayerId::Two, t2, filter, aim),
            ],
            registry,
            resolver: HitResolver::new(config.hit_radius),
            session: GameSession::new(SessionSettings {
                session_duration: config.session_duration_secs,
                crossfade_duration: config.crossfade_duration_secs,
                idle_clip: config.idle_clip.clone(),
                gameplay_clip: config.gameplay_clip.clone(),
            }),
            bounds: config.play_area.bounds(),
        }
    }

    /// Replace the play area supplied by the presentation layer
    pub fn set_play_area(&mut self, area: PlayAreaConfig) -> Result<(), SessionError> {
        if !area.is_valid() {
            return Err(SessionError::InvalidPlayArea);
        }
        self.bounds = area.bounds();
        debug!(half_width = area.half_width, half_height = area.half_height, "play area");
        Ok(())
    }

    /// Apply a discrete command between ticks
    pub fn apply(&mut self, command: Command) -> Result<Option<SessionEvent>, SessionError> {
        debug!(?command, "command");
        match command {
            Command::Start => self.session.start().map(Some),
            Command::ReturnToIdle => self.session.return_to_idle().map(Some),
            Command::Calibrate(Some(player)) => {
                self.device_mut(player).request_calibration();
                Ok(None)
            }
            Command::Calibrate(None) => {
                for device in &mut self.devices {
                    device.request_calibration();
                }
                Ok(None)
            }
            Command::AddScore { player, delta } => self.session.add(player, delta).map(Some),
            Command::SetPlayArea(area) => self.set_play_area(area).map(|()| None),
        }
    }

    /// Advance everything by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        let bounds = self.bounds;

        for device in &mut self.devices {
            let input = device.tick(dt, bounds);
            report.pulls += input.pulls;

            let (player, reticle) = (device.player(), input.reticle);
            for _ in 0..input.pulls {
                let Some(hit) = self.resolver.fire(reticle, player, &mut self.registry) else {
                    continue;
                };
                report.hits.push(hit);
                if let Ok(event) = self.session.add(hit.player, 1) {
                    report.events.push(event);
                }
            }
        }

        self.registry.advance(dt);

        if let Some(event) = self.session.tick(dt) {
            report.events.push(event);
        }
        report
    }

    /// Presentation record for the current tick
    pub fn snapshot(&self) -> SessionSnapshot {
        let winner_label = self.session.winner_label();
        SessionSnapshot {
            timestamp: Utc::now(),
            state: self.session.state(),
            scores: self.session.scores(),
            countdown: self.session.countdown(),
            winner: winner_label.map(|_| self.session.winner()),
            winner_label: winner_label.map(str::to_string),
            reticles: self.devices.iter().map(BlasterDevice::output).collect(),
            audio: self.session.audio_mix(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn device(&self, player: PlayerId) -> &BlasterDevice {
        &self.devices[player.index()]
    }

    pub fn device_mut(&mut self, player: PlayerId) -> &mut BlasterDevice {
        &mut self.devices[player.index()]
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

// =============================================================================
// TESTS
// =============================================================================
