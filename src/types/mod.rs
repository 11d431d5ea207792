//! Core types for the blaster

mod state;
mod frame;
mod geometry;
mod player;
mod target;
mod output;

pub use state::SessionState;
pub use frame::{SensorFrame, FrameUpdate, TriggerLevel};
pub use geometry::{Vec2, Rect, lerp};
pub use player::{PlayerId, Winner};
pub use target::{Target, TargetId};
pub use output::{SessionSnapshot, ReticleOutput, AudioMix};
