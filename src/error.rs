//! Error types

use thiserror::Error;

use crate::types::SessionState;

/// Invalid configuration, detected before the tick loop starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Line transport failures
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to open serial port {port} @ {baud}: {source}")]
    Open {
        port: String,
        baud: u32,
        #[source]
        source: serialport::Error,
    },

    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("{origin} failed {failures} polls in a row: {last}")]
    Unresponsive {
        origin: String,
        failures: u32,
        last: String,
    },
}

/// Rejected session commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    #[error("unknown player id {0} (expected 1 or 2)")]
    UnknownPlayer(u8),

    #[error("play area extents must be positive and finite")]
    InvalidPlayArea,
}
