//! # Printer Module
//!
//! Printer-specific configuration.
//!
//! - [`config`]: Printer hardware specifications

pub mod config;

pub use config::PrinterConfig;
