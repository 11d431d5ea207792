//! Motion Blaster: motion-controlled aiming and session core
//!
//! Serial sensor lines → motion filter → reticle → trigger/hit → session
//! state machine (Idle → Gameplay → GameOver) with audio crossfades.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// MOTION FILTER DEFAULTS
// =============================================================================

/// Exponential smoothing factor (higher = slower response)
pub const DEFAULT_SMOOTHING: f32 = 0.95;

/// World units per filtered degree
pub const DEFAULT_MOVE_SCALE: f32 = 0.01;

/// Angular rates below this magnitude are treated as drift
pub const DEFAULT_YAW_DEADBAND: f32 = 0.3;

/// Gap between the reticle and the play-area edge (world units)
pub const DEFAULT_RETICLE_MARGIN: f32 = 0.5;

// =============================================================================
// HIT RESOLUTION
// =============================================================================

/// Forgiveness radius around the reticle
pub const DEFAULT_HIT_RADIUS: f32 = 0.15;

/// Collider radius of a reference target
pub const DEFAULT_TARGET_RADIUS: f32 = 0.4;

/// Seconds a hit target stays down before respawning
pub const DEFAULT_RESPAWN_DELAY_SECS: f32 = 0.5;

/// Reference target grid layout
pub const TARGET_GRID_COLUMNS: usize = 4;
pub const TARGET_GRID_ROWS: usize = 2;

/// Share of the play-area half extents the target grid spans
pub const TARGET_GRID_FILL_X: f32 = 0.8;
pub const TARGET_GRID_FILL_Y: f32 = 0.7;

// =============================================================================
// SESSION
// =============================================================================

/// Length of one round (seconds)
pub const DEFAULT_SESSION_DURATION_SECS: f32 = 60.0;

/// Idle ↔ gameplay music crossfade (seconds)
pub const DEFAULT_CROSSFADE_DURATION_SECS: f32 = 1.5;

/// Fixed tick rate of the CLI loop
pub const DEFAULT_TICK_HZ: u32 = 60;

// =============================================================================
// TRANSPORT
// =============================================================================

pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Serial read timeout (milliseconds)
pub const SERIAL_READ_TIMEOUT_MS: u64 = 100;

/// Back-to-back serial errors before a port is given up on
pub const SERIAL_MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Upper bound on lines folded per device per tick
pub const MAX_LINES_PER_TICK: usize = 32;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
