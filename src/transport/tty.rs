//! # Serial TTY Transport
//!
//! Talks to receipt printers exposed as Unix character devices: USB serial
//! adapters (`/dev/ttyUSB*`, `/dev/ttyACM*`), Bluetooth SPP bindings
//! (`/dev/rfcomm*`) and on-board UARTs (`/dev/ttyS*`).
//!
//! ## Device Selection
//!
//! The device is always chosen by the user through a [`PortChooser`]. The
//! CLI prompts on the terminal with [`StdinChooser`]; `--device` skips the
//! prompt with a [`FixedPort`]. Nothing is opened automatically.
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so binary data is transmitted without
//! modification:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR,
//!   ICRNL cleared
//! - **No software flow control**: IXON, IXOFF, IXANY cleared (0x11 and 0x13
//!   are ordinary bytes in a command stream)
//! - **No output processing**: OPOST cleared (no CR/LF translation)
//! - **8N1**: CS8, no parity, one stop bit, receiver on, modem lines ignored
//! - **Line speed**: `PrinterConfig::baud_rate` in both directions
//!
//! ## Chunked Writes
//!
//! Writes are split into `PrinterConfig::chunk_size` pieces with a short
//! pause in between, so slow serial printers are not overrun.

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{SerialHost, SerialPort};
use crate::error::ConnectionError;
use crate::printer::PrinterConfig;

/// Device name prefixes under `/dev` that can carry a serial printer.
pub const CANDIDATE_PREFIXES: &[&str] = &["ttyUSB", "ttyACM", "rfcomm", "ttyS"];

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// List serial devices a printer could be attached to, sorted by name.
pub fn list_candidate_ports() -> Vec<String> {
    let Ok(entries) = fs::read_dir("/dev") else {
        return Vec::new();
    };

    let mut ports: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| CANDIDATE_PREFIXES.iter().any(|p| name.starts_with(p)))
        .map(|name| format!("/dev/{}", name))
        .collect();
    ports.sort();
    ports
}

// ============================================================================
// DEVICE SELECTION
// ============================================================================

/// The user-facing half of pairing: pick one device out of the candidates.
pub trait PortChooser: Send + Sync {
    /// Return the chosen device path, or `None` when the user backs out.
    fn choose(&self, candidates: &[String]) -> Option<String>;
}

/// A device chosen ahead of time (e.g. `--device /dev/ttyUSB0`).
#[derive(Debug, Clone)]
pub struct FixedPort(pub String);

impl PortChooser for FixedPort {
    fn choose(&self, _candidates: &[String]) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Interactive selection on the terminal.
///
/// Lists the candidates on stderr and reads a number or a path from stdin.
/// An empty answer, end of input or an unknown number cancels.
#[derive(Debug, Clone, Default)]
pub struct StdinChooser;

impl PortChooser for StdinChooser {
    fn choose(&self, candidates: &[String]) -> Option<String> {
        let mut stderr = io::stderr().lock();
        if candidates.is_empty() {
            let _ = writeln!(stderr, "No serial devices found.");
        } else {
            let _ = writeln!(stderr, "Serial devices:");
            for (i, port) in candidates.iter().enumerate() {
                let _ = writeln!(stderr, "  [{}] {}", i + 1, port);
            }
        }
        let _ = write!(stderr, "Select a device (number or path, empty to cancel): ");
        let _ = stderr.flush();
        drop(stderr);

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).ok()?;
        parse_choice(answer.trim(), candidates)
    }
}

fn parse_choice(answer: &str, candidates: &[String]) -> Option<String> {
    if answer.is_empty() {
        return None;
    }
    match answer.parse::<usize>() {
        Ok(n) => candidates.get(n.checked_sub(1)?).cloned(),
        Err(_) => Some(answer.to_string()),
    }
}

// ============================================================================
// HOST
// ============================================================================

/// Serial host backed by `/dev` character devices.
#[derive(Clone)]
pub struct TtyHost {
    chooser: Arc<dyn PortChooser>,
}

impl TtyHost {
    /// Create a host that asks `chooser` which device to open.
    pub fn new(chooser: impl PortChooser + 'static) -> Self {
        Self {
            chooser: Arc::new(chooser),
        }
    }

    /// Create a host that always opens `path`.
    pub fn fixed(path: impl Into<String>) -> Self {
        Self::new(FixedPort(path.into()))
    }
}

impl Default for TtyHost {
    fn default() -> Self {
        Self::new(StdinChooser)
    }
}

#[async_trait]
impl SerialHost for TtyHost {
    fn is_supported(&self) -> bool {
        cfg!(unix)
    }

    async fn request_port(&self) -> Result<Option<String>, ConnectionError> {
        let chooser = Arc::clone(&self.chooser);
        tokio::task::spawn_blocking(move || chooser.choose(&list_candidate_ports()))
            .await
            .map_err(|e| ConnectionError::Open(format!("device selection failed: {}", e)))
    }

    async fn open(
        &self,
        path: &str,
        config: &PrinterConfig,
    ) -> Result<Box<dyn SerialPort>, ConnectionError> {
        let path = path.to_string();
        let baud_rate = config.baud_rate;
        let chunk_size = config.chunk_size.max(1);

        let opened = {
            let path = path.clone();
            tokio::task::spawn_blocking(move || open_raw(&path, baud_rate))
        };
        let file = opened
            .await
            .map_err(|e| ConnectionError::Open(format!("{}: {}", path, e)))??;

        debug!(port = %path, baud_rate, "Opened serial device in raw mode");
        Ok(Box::new(TtyPort {
            name: path,
            file: Some(Arc::new(Mutex::new(file))),
            chunk_size,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }))
    }
}

// ============================================================================
// PORT
// ============================================================================

/// An open serial device.
pub struct TtyPort {
    name: String,
    file: Option<Arc<Mutex<File>>>,
    chunk_size: usize,
    chunk_delay: Duration,
}

#[async_trait]
impl SerialPort for TtyPort {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let Some(file) = self.file.as_ref().map(Arc::clone) else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "port closed"));
        };
        let data = bytes.to_vec();
        let chunk_size = self.chunk_size;
        let chunk_delay = self.chunk_delay;

        tokio::task::spawn_blocking(move || {
            // Held for the whole write, released on every return path
            let mut file = file
                .lock()
                .map_err(|_| io::Error::other("serial port lock poisoned"))?;
            write_chunked(&mut *file, &data, chunk_size, chunk_delay)
        })
        .await
        .map_err(io::Error::other)?
    }

    async fn close(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        let flushed = tokio::task::spawn_blocking(move || {
            let result = match file.lock() {
                Ok(mut file) => file.flush(),
                Err(_) => Ok(()),
            };
            result
        })
        .await;
        if let Ok(Err(e)) = flushed {
            warn!(port = %self.name, error = %e, "Flush on close failed");
        }
    }
}

/// Write `data` in chunks of at most `chunk_size` bytes, pausing between
/// chunks.
fn write_chunked<W: Write>(
    out: &mut W,
    data: &[u8],
    chunk_size: usize,
    chunk_delay: Duration,
) -> io::Result<()> {
    if data.len() <= chunk_size {
        out.write_all(data)?;
    } else {
        for chunk in data.chunks(chunk_size) {
            out.write_all(chunk)?;
            if !chunk_delay.is_zero() {
                thread::sleep(chunk_delay);
            }
        }
    }
    out.flush()
}

// ============================================================================
// RAW MODE
// ============================================================================

#[cfg(unix)]
fn open_raw(path: &str, baud_rate: u32) -> Result<File, ConnectionError> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::AsRawFd;

    let file = OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
        .map_err(|e| ConnectionError::Open(format!("{}: {}", path, e)))?;

    configure_tty_raw(file.as_raw_fd(), baud_rate)
        .map_err(|e| ConnectionError::Open(format!("{}: {}", path, e)))?;

    Ok(file)
}

#[cfg(not(unix))]
fn open_raw(_path: &str, _baud_rate: u32) -> Result<File, ConnectionError> {
    Err(ConnectionError::UnsupportedPlatform)
}

/// Map a line speed to its termios constant.
#[cfg(unix)]
fn speed_constant(baud_rate: u32) -> Option<libc::speed_t> {
    let speed = match baud_rate {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        _ => return None,
    };
    Some(speed)
}

/// Configure a file descriptor for raw 8N1 at `baud_rate`.
#[cfg(unix)]
fn configure_tty_raw(fd: i32, baud_rate: u32) -> io::Result<()> {
    use std::mem::MaybeUninit;

    let speed = speed_constant(baud_rate).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported baud rate {}", baud_rate),
        )
    })?;

    let mut termios = MaybeUninit::uninit();
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::CSTOPB);
    termios.c_cflag |= libc::CS8 | libc::CREAD | libc::CLOCAL;

    unsafe {
        if libc::cfsetispeed(&mut termios, speed) != 0
            || libc::cfsetospeed(&mut termios, speed) != 0
        {
            return Err(io::Error::last_os_error());
        }
        if libc::tcsetattr(fd, libc::TCSANOW, &termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["/dev/ttyUSB0".to_string(), "/dev/rfcomm0".to_string()]
    }

    #[test]
    fn test_choice_by_number() {
        assert_eq!(parse_choice("2", &candidates()), Some("/dev/rfcomm0".into()));
    }

    #[test]
    fn test_choice_by_path() {
        assert_eq!(
            parse_choice("/dev/ttyS1", &candidates()),
            Some("/dev/ttyS1".into())
        );
    }

    #[test]
    fn test_empty_choice_cancels() {
        assert_eq!(parse_choice("", &candidates()), None);
    }

    #[test]
    fn test_out_of_range_choice_cancels() {
        assert_eq!(parse_choice("0", &candidates()), None);
        assert_eq!(parse_choice("3", &candidates()), None);
    }

    #[test]
    fn test_fixed_port_ignores_candidates() {
        assert_eq!(
            FixedPort("/dev/ttyACM0".into()).choose(&[]),
            Some("/dev/ttyACM0".into())
        );
    }

    #[test]
    fn test_write_chunked_small() {
        let mut out = Vec::new();
        write_chunked(&mut out, b"hello", 512, Duration::ZERO).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_write_chunked_large() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1300).collect();
        let mut out = Vec::new();
        write_chunked(&mut out, &data, 512, Duration::ZERO).unwrap();
        assert_eq!(out, data);
    }

    #[cfg(unix)]
    #[test]
    fn test_speed_constants() {
        assert_eq!(speed_constant(9600), Some(libc::B9600));
        assert_eq!(speed_constant(115200), Some(libc::B115200));
        assert_eq!(speed_constant(12345), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_open_missing_device() {
        let host = TtyHost::fixed("/dev/boleta-does-not-exist");
        let err = host
            .open("/dev/boleta-does-not-exist", &PrinterConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::Open(_)));
    }

    #[tokio::test]
    async fn test_fixed_host_requests_its_port() {
        let host = TtyHost::fixed("/dev/ttyUSB3");
        assert_eq!(
            host.request_port().await.unwrap(),
            Some("/dev/ttyUSB3".to_string())
        );
    }
}
