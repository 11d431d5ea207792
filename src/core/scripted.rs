//! In-memory line transport fed from the same process.
//!
//! Used by unit and integration tests to drive a device line by line.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use crate::core::{LineAssembler, LineSource};
use crate::error::TransportError;

#[derive(Debug, Default)]
struct Script {
    lines: VecDeque<String>,
    bytes: Vec<u8>,
    unplugged: bool,
}

/// Transport driven through a [`ScriptedFeed`] handle
#[derive(Debug)]
pub struct ScriptedLineSource {
    script: Arc<Mutex<Script>>,
    assembler: LineAssembler,
}

/// Writer side of a [`ScriptedLineSource`]
#[derive(Debug, Clone)]
pub struct ScriptedFeed {
    script: Arc<Mutex<Script>>,
}

impl ScriptedLineSource {
    pub fn new() -> (Self, ScriptedFeed) {
        let script = Arc::new(Mutex::new(Script::default()));
        (
            Self {
                script: Arc::clone(&script),
                assembler: LineAssembler::new(),
            },
            ScriptedFeed { script },
        )
    }
}

impl ScriptedFeed {
    /// Queue one complete line
    pub fn push_line(&self, line: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.lines.push_back(line.into());
        }
    }

    /// Queue raw bytes, possibly splitting a line across ticks
    pub fn push_bytes(&self, bytes: &[u8]) {
        if let Ok(mut script) = self.script.lock() {
            script.bytes.extend_from_slice(bytes);
        }
    }

    /// Make the next poll fail as if the device was removed
    pub fn unplug(&self) {
        if let Ok(mut script) = self.script.lock() {
            script.unplugged = true;
        }
    }
}

impl LineSource for ScriptedLineSource {
    fn poll(&mut self, max_lines: usize) -> Result<Vec<String>, TransportError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "script poisoned"))?;
        if script.unplugged {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged").into());
        }

        let bytes = std::mem::take(&mut script.bytes);
        self.assembler.push(&bytes);
        while let Some(line) = script.lines.pop_front() {
            self.assembler.push_line(line);
        }
        Ok(self.assembler.drain(max_lines))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
