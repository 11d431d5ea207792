//! Line-oriented sensor transports.
//!
//! Every transport is polled once per tick and must return immediately:
//! an empty batch is the normal "nothing arrived" outcome.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::{SERIAL_MAX_CONSECUTIVE_ERRORS, SERIAL_READ_TIMEOUT_MS};

/// Partial lines longer than this are discarded
const RX_BUF_MAX: usize = 16 * 1024;

/// Source of complete sensor lines
pub trait LineSource: Send {
    /// Up to `max_lines` complete lines that are ready now; never blocks
    fn poll(&mut self, max_lines: usize) -> Result<Vec<String>, TransportError>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

impl TransportError {
    /// True when polling again cannot succeed (device gone)
    pub fn is_fatal(&self) -> bool {
        match self {
            TransportError::Open { .. } | TransportError::Unresponsive { .. } => true,
            TransportError::Io(e) => !is_retryable(e.kind()),
            TransportError::Serial(e) => e.kind() == serialport::ErrorKind::NoDevice,
        }
    }

    fn is_timeout(&self) -> bool {
        match self {
            TransportError::Io(e) => is_retryable(e.kind()),
            TransportError::Serial(e) => {
                matches!(e.kind(), serialport::ErrorKind::Io(kind) if is_retryable(kind))
            }
            _ => false,
        }
    }
}

fn is_retryable(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

/// Counts back-to-back transient failures and escalates past a limit
#[derive(Debug, Clone, Copy)]
struct FailureStreak {
    count: u32,
    limit: u32,
}

impl FailureStreak {
    fn new(limit: u32) -> Self {
        Self { count: 0, limit }
    }

    fn observe<T>(
        &mut self,
        result: Result<T, TransportError>,
        origin: &str,
    ) -> Result<T, TransportError> {
        let e = match result {
            Ok(value) => {
                self.count = 0;
                return Ok(value);
            }
            Err(e) => e,
        };
        if e.is_fatal() || e.is_timeout() {
            return Err(e);
        }

        self.count += 1;
        debug!(origin, failures = self.count, error = %e, "transport error");
        if self.count >= self.limit {
            return Err(TransportError::Unresponsive {
                origin: origin.to_string(),
                failures: self.count,
                last: e.to_string(),
            });
        }
        Err(e)
    }
}

// =============================================================================
// LINE ASSEMBLY
// =============================================================================

/// Reassembles `\n`-terminated lines from arbitrary byte chunks
#[derive(Debug, Default)]
pub struct LineAssembler {
    rx_buf: Vec<u8>,
    lines: VecDeque<String>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                let line = String::from_utf8_lossy(&self.rx_buf)
                    .trim_end_matches('\r')
                    .to_string();
                self.rx_buf.clear();
                self.lines.push_back(line);
            } else {
                self.rx_buf.push(b);
            }
        }

        if self.rx_buf.len() > RX_BUF_MAX {
            warn!(len = self.rx_buf.len(), "dropping unterminated serial input");
            self.rx_buf.clear();
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    /// Queue a line that arrived already framed
    pub(crate) fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
    }

    pub(crate) fn drain(&mut self, max_lines: usize) -> Vec<String> {
        let n = max_lines.min(self.lines.len());
        self.lines.drain(..n).collect()
    }
}

// =============================================================================
// SERIAL
// =============================================================================

/// Serial port polled without blocking: only bytes already received are read
pub struct SerialLineSource {
    port: Box<dyn SerialPort>,
    name: String,
    assembler: LineAssembler,
    failures: FailureStreak,
}

impl SerialLineSource {
    pub fn open(port: &str, baud: u32) -> Result<Self, TransportError> {
        let serial = serialport::new(port, baud)
            .timeout(Duration::from_millis(SERIAL_READ_TIMEOUT_MS))
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                baud,
                source,
            })?;

        info!(port, baud, "serial opened");
        Ok(Self::from_port(serial, port))
    }

    /// Wrap an already-open port
    pub fn from_port(port: Box<dyn SerialPort>, name: impl Into<String>) -> Self {
        Self {
            port,
            name: name.into(),
            assembler: LineAssembler::new(),
            failures: FailureStreak::new(SERIAL_MAX_CONSECUTIVE_ERRORS),
        }
    }

    fn read_available(&mut self) -> Result<(), TransportError> {
        let available = self.port.bytes_to_read()? as usize;
        if available > 0 {
            let mut chunk = vec![0u8; available];
            match self.port.read(&mut chunk) {
                Ok(n) => self.assembler.push(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl LineSource for SerialLineSource {
    fn poll(&mut self, max_lines: usize) -> Result<Vec<String>, TransportError> {
        let result = self.read_available();
        self.failures.observe(result, &self.name)?;
        Ok(self.assembler.drain(max_lines))
    }

    fn describe(&self) -> String {
        format!("serial {}", self.name)
    }
}

impl Drop for SerialLineSource {
    fn drop(&mut self) {
        info!(port = %self.name, "serial closed");
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Recorded sensor log, one line per tick; silent once exhausted
#[derive(Debug)]
pub struct ReplayLineSource {
    lines: VecDeque<String>,
    name: String,
}

impl ReplayLineSource {
    pub fn open(path: &Path) -> Result<Self, TransportError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), path.display().to_string())
    }

    pub fn from_reader<R: BufRead>(
        reader: R,
        name: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let lines = reader.lines().collect::<Result<VecDeque<_>, _>>()?;
        Ok(Self {
            lines,
            name: name.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ReplayLineSource {
    fn poll(&mut self, max_lines: usize) -> Result<Vec<String>, TransportError> {
        if max_lines == 0 {
            return Ok(Vec::new());
        }
        Ok(self.lines.pop_front().into_iter().collect())
    }

    fn describe(&self) -> String {
        format!("replay {}", self.name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
