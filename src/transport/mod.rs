//! # Device Transport
//!
//! Owns the connection to a user-paired serial receipt printer.
//!
//! ## Backends
//!
//! - [`tty`]: Unix serial character devices (USB serial, RFCOMM, UART)
//! - [`loopback`]: in-memory device for tests and dry runs
//!
//! Backends plug in through two traits: a [`SerialHost`] that knows how to
//! ask the user for a port and open it, and the [`SerialPort`] it returns.
//! [`DeviceTransport`] holds at most one open port and is the only place
//! that decides whether the printer is connected.
//!
//! ## Example
//!
//! ```
//! use boleta::printer::PrinterConfig;
//! use boleta::transport::{DeviceTransport, LoopbackHost};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = LoopbackHost::new();
//! let mut transport = DeviceTransport::new(host.clone(), PrinterConfig::default());
//!
//! transport.connect().await?;
//! transport.write(b"\x1b@hello\n").await?;
//! transport.disconnect().await;
//!
//! assert_eq!(host.written(), b"\x1b@hello\n");
//! # Ok(())
//! # }
//! ```

pub mod loopback;
pub mod tty;

pub use loopback::LoopbackHost;
pub use tty::{FixedPort, PortChooser, StdinChooser, TtyHost};

use std::io;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ConnectionError, TransmissionError};
use crate::printer::PrinterConfig;

/// An open serial connection.
#[async_trait]
pub trait SerialPort: Send {
    /// Device name, for logs.
    fn name(&self) -> &str;

    /// Write every byte, or fail.
    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Release the device. Called exactly once per opened port.
    async fn close(&mut self);
}

/// A host able to enumerate, choose and open serial devices.
#[async_trait]
pub trait SerialHost: Send + Sync {
    /// Whether this host can talk to serial devices at all.
    fn is_supported(&self) -> bool;

    /// Ask the user to pick a device. `None` means they backed out.
    async fn request_port(&self) -> Result<Option<String>, ConnectionError>;

    /// Open the chosen device at the configured line speed.
    async fn open(
        &self,
        path: &str,
        config: &PrinterConfig,
    ) -> Result<Box<dyn SerialPort>, ConnectionError>;
}

/// # Device Transport
///
/// Connection state is exactly "holds an open port": there is no separate
/// flag that could drift from the handle.
///
/// `connect`, `write` and `disconnect` take `&mut self`, so one transport
/// can never run two of them at once.
pub struct DeviceTransport {
    host: Box<dyn SerialHost>,
    config: PrinterConfig,
    port: Option<Box<dyn SerialPort>>,
}

impl DeviceTransport {
    /// Create a disconnected transport on `host`.
    pub fn new(host: impl SerialHost + 'static, config: PrinterConfig) -> Self {
        Self {
            host: Box::new(host),
            config,
            port: None,
        }
    }

    /// Whether a device is currently open.
    pub fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    /// Name of the open device, if any.
    pub fn port_name(&self) -> Option<&str> {
        self.port.as_ref().map(|p| p.name())
    }

    /// Printer settings the transport opens devices with.
    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Ask the user for a device and open it.
    ///
    /// The transport is only marked connected once the port is open. A
    /// cancelled choice leaves it disconnected and is reported as
    /// [`ConnectionError::UserCancelled`]. Connecting while connected
    /// closes the current device first.
    #[instrument(skip(self), fields(baud = self.config.baud_rate))]
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        if !self.host.is_supported() {
            warn!("Serial devices are not supported on this host");
            return Err(ConnectionError::UnsupportedPlatform);
        }

        self.disconnect().await;

        let path = match self.host.request_port().await? {
            Some(path) => path,
            None => {
                info!("Device selection cancelled");
                return Err(ConnectionError::UserCancelled);
            }
        };

        let port = self
            .host
            .open(&path, &self.config)
            .await
            .inspect_err(|e| error!(port = %path, error = %e, "Failed to open device"))?;

        info!(port = %path, "Printer connected");
        self.port = Some(port);
        Ok(())
    }

    /// Send bytes to the connected device.
    ///
    /// A failed write closes and drops the device before the error is
    /// returned. Nothing is retried.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn write(&mut self, bytes: &[u8]) -> Result<(), TransmissionError> {
        let Some(port) = self.port.as_mut() else {
            error!("Write attempted without a connected device");
            return Err(TransmissionError::NotConnected);
        };

        match port.write_all(bytes).await {
            Ok(()) => {
                debug!(port = port.name(), "Wrote {} bytes", bytes.len());
                Ok(())
            }
            Err(e) => {
                error!(port = port.name(), error = %e, "Write failed, dropping connection");
                self.disconnect().await;
                Err(TransmissionError::Write(e.to_string()))
            }
        }
    }

    /// Close the device if one is open. Safe to call in any state.
    pub async fn disconnect(&mut self) {
        if let Some(mut port) = self.port.take() {
            port.close().await;
            info!(port = port.name(), "Printer disconnected");
        }
    }
}

impl std::fmt::Debug for DeviceTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceTransport")
            .field("port", &self.port_name())
            .field("config", &self.config)
            .finish()
    }
}
