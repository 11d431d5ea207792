//! Discrete operator commands and the console syntax for them
//!
//! Console grammar (case-insensitive, one per line):
//! - `start` / `s`
//! - `idle` / `restart`
//! - `calibrate [1|2]` / `c [1|2]` (no player = both)
//! - `add <1|2> <points>`
//! - `area <half_width> <half_height>`
//! - `status`
//! - `quit` / `exit` / `q`

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::PlayAreaConfig;
use crate::types::PlayerId;

lazy_static! {
    static ref RE_START: Regex = Regex::new(r"(?i)^(start|s)$").unwrap();
    static ref RE_IDLE: Regex = Regex::new(r"(?i)^(idle|restart)$").unwrap();
    static ref RE_CALIBRATE: Regex = Regex::new(r"(?i)^(calibrate|cal|c)(?:\s+([12]))?$").unwrap();
    static ref RE_ADD: Regex = Regex::new(r"(?i)^add\s+([12])\s+(\d{1,9})$").unwrap();
    static ref RE_AREA: Regex = Regex::new(r"(?i)^area\s+([\d.]+)\s+([\d.]+)$").unwrap();
    static ref RE_STATUS: Regex = Regex::new(r"(?i)^status$").unwrap();
    static ref RE_QUIT: Regex = Regex::new(r"(?i)^(quit|exit|q)$").unwrap();
}

/// Command the game context understands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Begin a round (IDLE only)
    Start,
    /// Leave GAME_OVER
    ReturnToIdle,
    /// Zero one device, or both when `None`
    Calibrate(Option<PlayerId>),
    /// Manual score adjustment
    AddScore { player: PlayerId, delta: u32 },
    /// New visible play area from the presentation layer
    SetPlayArea(PlayAreaConfig),
}

/// A console line, decoded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    Game(Command),
    Status,
    Quit,
}

impl ConsoleCommand {
    /// Parse one console line; `None` for anything unrecognized
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        if RE_START.is_match(line) {
            return Some(ConsoleCommand::Game(Command::Start));
        }
        if RE_IDLE.is_match(line) {
            return Some(ConsoleCommand::Game(Command::ReturnToIdle));
        }
        if let Some(caps) = RE_CALIBRATE.captures(line) {
            let player = caps.get(2).and_then(|m| parse_player(m.as_str()));
            return Some(ConsoleCommand::Game(Command::Calibrate(player)));
        }
        if let Some(caps) = RE_ADD.captures(line) {
            let player = parse_player(&caps[1])?;
            let delta = caps[2].parse().ok()?;
            return Some(ConsoleCommand::Game(Command::AddScore { player, delta }));
        }
        if let Some(caps) = RE_AREA.captures(line) {
            let area = PlayAreaConfig::new(caps[1].parse().ok()?, caps[2].parse().ok()?);
            return Some(ConsoleCommand::Game(Command::SetPlayArea(area)));
        }
        if RE_STATUS.is_match(line) {
            return Some(ConsoleCommand::Status);
        }
        if RE_QUIT.is_match(line) {
            return Some(ConsoleCommand::Quit);
        }
        None
    }

    pub fn help() -> &'static str {
        "commands: start | idle | calibrate [1|2] | add <1|2> <points> | area <w> <h> | \
         status | quit"
    }
}

fn parse_player(s: &str) -> Option<PlayerId> {
    s.parse::<u8>().ok().and_then(|n| PlayerId::try_from(n).ok())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_idle() {
        assert_eq!(ConsoleCommand::parse("start"), Some(ConsoleCommand::Game(Command::Start)));
        assert_eq!(ConsoleCommand::parse("  S \n"), Some(ConsoleCommand::Game(Command::Start)));
        assert_eq!(
            ConsoleCommand::parse("Restart"),
            Some(ConsoleCommand::Game(Command::ReturnToIdle))
        );
    }

    #[test]
    fn test_calibrate_forms() {
        assert_eq!(
            ConsoleCommand::parse("c"),
            Some(ConsoleCommand::Game(Command::Calibrate(None)))
        );
        assert_eq!(
            ConsoleCommand::parse("calibrate 2"),
            Some(ConsoleCommand::Game(Command::Calibrate(Some(PlayerId::Two))))
        );
        assert_eq!(ConsoleCommand::parse("calibrate 3"), None);
    }

    #[test]
    fn test_add() {
        assert_eq!(
            ConsoleCommand::parse("add 1 3"),
            Some(ConsoleCommand::Game(Command::AddScore {
                player: PlayerId::One,
                delta: 3
            }))
        );
        assert_eq!(ConsoleCommand::parse("add 1 -3"), None);
        assert_eq!(ConsoleCommand::parse("add 1"), None);
    }

    #[test]
    fn test_area() {
        let area = PlayAreaConfig::new(6.0, 3.5);
        assert_eq!(
            ConsoleCommand::parse("area 6 3.5"),
            Some(ConsoleCommand::Game(Command::SetPlayArea(area)))
        );
        assert_eq!(ConsoleCommand::parse("area 6"), None);
        assert_eq!(ConsoleCommand::parse("area -6 3"), None);
    }

    #[test]
    fn test_quit_and_unknown() {
        assert_eq!(ConsoleCommand::parse("exit"), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("status"), Some(ConsoleCommand::Status));
        assert_eq!(ConsoleCommand::parse("fire!"), None);
        assert_eq!(ConsoleCommand::parse(""), None);
    }
}
