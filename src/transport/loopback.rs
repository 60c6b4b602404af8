//! # Loopback Transport
//!
//! An in-memory serial host. Every byte written to its port is recorded, and
//! switches simulate the ways a real host fails: no serial support, a user
//! who backs out of device selection, a device that will not open, and
//! writes that break mid-print.
//!
//! Clones share the same state, so a test can keep one handle while the
//! [`DeviceTransport`](super::DeviceTransport) owns another.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{SerialHost, SerialPort};
use crate::error::ConnectionError;
use crate::printer::PrinterConfig;

/// Name reported by the loopback port.
pub const LOOPBACK_PORT: &str = "loopback";

#[derive(Debug, Default)]
struct State {
    unsupported: bool,
    cancel: bool,
    fail_open: bool,
    fail_writes: bool,
    written: Vec<u8>,
    writes: usize,
    opened: usize,
    closed: usize,
}

/// In-memory serial host.
#[derive(Debug, Clone, Default)]
pub struct LoopbackHost {
    state: Arc<Mutex<State>>,
}

impl LoopbackHost {
    /// A host whose single device always opens and accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report no serial support.
    pub fn unsupported(self) -> Self {
        self.lock().unsupported = true;
        self
    }

    /// Answer every device selection with a cancel.
    pub fn cancelling(self) -> Self {
        self.lock().cancel = true;
        self
    }

    /// Fail every open.
    pub fn failing_open(self) -> Self {
        self.lock().fail_open = true;
        self
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Every byte written so far.
    pub fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Number of ports opened.
    pub fn open_count(&self) -> usize {
        self.lock().opened
    }

    /// Number of ports closed.
    pub fn close_count(&self) -> usize {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test must not hide the recorded bytes from the next one
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SerialHost for LoopbackHost {
    fn is_supported(&self) -> bool {
        !self.lock().unsupported
    }

    async fn request_port(&self) -> Result<Option<String>, ConnectionError> {
        if self.lock().cancel {
            return Ok(None);
        }
        Ok(Some(LOOPBACK_PORT.to_string()))
    }

    async fn open(
        &self,
        path: &str,
        _config: &PrinterConfig,
    ) -> Result<Box<dyn SerialPort>, ConnectionError> {
        let mut state = self.lock();
        if state.fail_open {
            return Err(ConnectionError::Open(format!("{}: device busy", path)));
        }
        state.opened += 1;
        Ok(Box::new(LoopbackPort {
            name: path.to_string(),
            host: self.clone(),
        }))
    }
}

struct LoopbackPort {
    name: String,
    host: LoopbackHost,
}

#[async_trait]
impl SerialPort for LoopbackPort {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.host.lock();
        if state.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "loopback device went away",
            ));
        }
        state.written.extend_from_slice(bytes);
        state.writes += 1;
        Ok(())
    }

    async fn close(&mut self) {
        self.host.lock().closed += 1;
    }
}
