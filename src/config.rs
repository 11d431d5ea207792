//! Game configuration: JSON file + CLI overrides, validated before the loop starts

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::FilterConfig;
use crate::error::ConfigError;
use crate::types::{PlayerId, Rect};
use crate::{
    DEFAULT_BAUD_RATE, DEFAULT_CROSSFADE_DURATION_SECS, DEFAULT_HIT_RADIUS,
    DEFAULT_MOVE_SCALE, DEFAULT_RESPAWN_DELAY_SECS, DEFAULT_RETICLE_MARGIN,
    DEFAULT_SESSION_DURATION_SECS, DEFAULT_SMOOTHING, DEFAULT_TARGET_RADIUS,
    DEFAULT_TICK_HZ, DEFAULT_YAW_DEADBAND,
};

/// Where one player's sensor lines come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Serial device, e.g. `/dev/ttyUSB0` or `COM5`
    pub port: Option<String>,
    pub baud: u32,
    /// Recorded sensor log replayed one line per tick
    pub replay: Option<PathBuf>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: DEFAULT_BAUD_RATE,
            replay: None,
        }
    }
}

/// Visible play area, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayAreaConfig {
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for PlayAreaConfig {
    fn default() -> Self {
        // 16:9 orthographic view with size 5
        Self {
            half_width: 8.89,
            half_height: 5.0,
        }
    }
}

impl PlayAreaConfig {
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width,
            half_height,
        }
    }

    /// Both half extents positive and finite
    pub fn is_valid(&self) -> bool {
        [self.half_width, self.half_height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.half_width, self.half_height)
    }
}

/// All tunables of the blaster core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub smoothing: f32,
    pub move_scale: f32,
    pub mount_pitch_offset: f32,
    pub yaw_deadband: f32,
    pub hit_radius: f32,
    pub target_radius: f32,
    pub respawn_delay_secs: f32,
    pub session_duration_secs: f32,
    pub crossfade_duration_secs: f32,
    pub reticle_margin: f32,
    pub tick_hz: u32,
    pub play_area: PlayAreaConfig,
    pub idle_clip: String,
    pub gameplay_clip: String,
    pub players: [PlayerConfig; 2],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            move_scale: DEFAULT_MOVE_SCALE,
            mount_pitch_offset: 0.0,
            yaw_deadband: DEFAULT_YAW_DEADBAND,
            hit_radius: DEFAULT_HIT_RADIUS,
            target_radius: DEFAULT_TARGET_RADIUS,
            respawn_delay_secs: DEFAULT_RESPAWN_DELAY_SECS,
            session_duration_secs: DEFAULT_SESSION_DURATION_SECS,
            crossfade_duration_secs: DEFAULT_CROSSFADE_DURATION_SECS,
            reticle_margin: DEFAULT_RETICLE_MARGIN,
            tick_hz: DEFAULT_TICK_HZ,
            play_area: PlayAreaConfig::default(),
            idle_clip: "idle".to_string(),
            gameplay_clip: "gameplay".to_string(),
            players: [PlayerConfig::default(), PlayerConfig::default()],
        }
    }
}

impl GameConfig {
    /// Load a JSON config file; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn player(&self, id: PlayerId) -> &PlayerConfig {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerConfig {
        &mut self.players[id.index()]
    }

    /// Filter parameters shared by both devices
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            smoothing: self.smoothing,
            yaw_deadband: self.yaw_deadband,
            mount_pitch_offset: self.mount_pitch_offset,
        }
    }

    /// Reject anything the tick loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.smoothing.is_finite() || !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::invalid("smoothing", "must be within [0, 1]"));
        }
        require_positive("move_scale", self.move_scale)?;
        require_finite("mount_pitch_offset", self.mount_pitch_offset)?;
        require_non_negative("yaw_deadband", self.yaw_deadband)?;
        require_non_negative("hit_radius", self.hit_radius)?;
        require_non_negative("target_radius", self.target_radius)?;
        require_non_negative("respawn_delay_secs", self.respawn_delay_secs)?;
        require_positive("session_duration_secs", self.session_duration_secs)?;
        require_non_negative("crossfade_duration_secs", self.crossfade_duration_secs)?;
        require_non_negative("reticle_margin", self.reticle_margin)?;
        require_positive("play_area.half_width", self.play_area.half_width)?;
        require_positive("play_area.half_height", self.play_area.half_height)?;
        if self.tick_hz == 0 {
            return Err(ConfigError::invalid("tick_hz", "must be greater than 0"));
        }
        for player in &self.players {
            if player.baud == 0 {
                return Err(ConfigError::invalid("players.baud", "must be greater than 0"));
            }
        }
        Ok(())
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {}", value)))
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {}", value)))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must not be negative, got {}", value)))
    }
}

// =============================================================================
// TESTS
// =============================================================================
