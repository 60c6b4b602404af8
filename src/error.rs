//! # Error Types
//!
//! This module defines error types used throughout the boleta library.
//!
//! Device and surface failures are separate enums so the orchestrator can
//! branch on them; [`BoletaError`] gathers everything for the CLI.

use thiserror::Error;

/// An invoice failed validation before any encoding or rendering started.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The JSON could not be parsed at all
    #[error("Malformed invoice JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing or empty
    #[error("{context}: missing required field '{field}'")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },

    /// A field is present but holds an unusable value
    #[error("{context}: invalid {field}: {message}")]
    InvalidField {
        context: &'static str,
        field: &'static str,
        message: String,
    },
}

/// Pairing with a serial device failed or was declined.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The host has no serial device support
    #[error("Serial devices are not supported on this platform")]
    UnsupportedPlatform,

    /// The user aborted device selection
    #[error("Device selection was cancelled")]
    UserCancelled,

    /// The selected device could not be opened
    #[error("Failed to open device: {0}")]
    Open(String),
}

impl ConnectionError {
    /// Whether this outcome means "print the fallback instead" rather than a
    /// failure worth surfacing.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::UnsupportedPlatform | Self::UserCancelled)
    }
}

/// Writing to an open device failed.
#[derive(Debug, Error)]
pub enum TransmissionError {
    /// `write` was called without a connection
    #[error("No device connected")]
    NotConnected,

    /// The device rejected or dropped the write
    #[error("Write failed: {0}")]
    Write(String),
}

/// The temporary print surface could not be created, used, or removed.
#[derive(Debug, Error)]
pub enum RenderSurfaceError {
    #[error("Failed to create print surface: {0}")]
    Create(String),

    #[error("Failed to load document into print surface: {0}")]
    Load(String),

    #[error("Failed to open print dialog: {0}")]
    Trigger(String),

    #[error("Failed to remove print surface: {0}")]
    Remove(String),
}

/// A print request failed at the orchestrator boundary.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error(transparent)]
    Transmission(#[from] TransmissionError),

    #[error(transparent)]
    RenderSurface(#[from] RenderSurfaceError),
}

/// Main error type for boleta operations
#[derive(Debug, Error)]
pub enum BoletaError {
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Print(#[from] PrintError),

    /// Settings file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
