//! Core modules for the blaster gallery

pub mod line_parser;
pub mod motion_filter;
pub mod aim;
pub mod trigger;
pub mod hit;
pub mod targets;
pub mod crossfade;
pub mod timer;
pub mod session;
pub mod transport;
#[doc(hidden)]
pub mod scripted;
pub mod device;
pub mod command;
pub mod game;
pub mod api;

pub use line_parser::SensorLineParser;
pub use motion_filter::{DisplayAim, FilterConfig, FilterState, MotionFilter};
pub use aim::AimMapper;
pub use trigger::TriggerEdge;
pub use hit::{Hit, HitResolver, TargetRegistry};
pub use targets::TargetField;
pub use crossfade::{AudioChannel, CrossfadeScheduler};
pub use timer::{SessionTimer, TimerState};
pub use session::{GameSession, SessionEvent, SessionSettings};
pub use transport::{LineAssembler, LineSource, ReplayLineSource, SerialLineSource};
#[doc(hidden)]
pub use scripted::{ScriptedFeed, ScriptedLineSource};
pub use device::{BlasterDevice, DeviceTick};
pub use command::{Command, ConsoleCommand};
pub use game::{GameContext, TickReport};
pub use api::{create_router, run_server, ApiState};
