//! # Printer Configuration
//!
//! Hardware characteristics of the serial receipt printer.
//!
//! ## Presets
//!
//! | Preset | Paper | Columns (Font A) | Line speed |
//! |--------|-------|------------------|------------|
//! | `PAPER_80MM` | 80mm | 48 | 9600 8N1 |
//! | `PAPER_58MM` | 58mm | 32 | 9600 8N1 |
//!
//! ## Usage
//!
//! ```
//! use boleta::printer::PrinterConfig;
//!
//! let config = PrinterConfig::PAPER_80MM;
//! assert_eq!(config.columns, 48);
//! assert_eq!(config.baud_rate, 9600);
//! ```

use serde::{Deserialize, Serialize};

/// # Printer Configuration
///
/// - **columns**: characters per line in the default font, used to lay out
///   two-column lines (label left, amount right)
/// - **baud_rate**: fixed line speed the serial port is opened at
/// - **chunk_size**: largest single write handed to the device
/// - **cut_feed_lines**: lines fed past the cutter before the cut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Printer model or preset name
    pub name: String,

    /// Characters per line
    pub columns: usize,

    /// Serial line speed in baud
    pub baud_rate: u32,

    /// Maximum bytes per write
    pub chunk_size: usize,

    /// Lines fed before cutting
    pub cut_feed_lines: u8,
}

impl PrinterConfig {
    /// 80mm paper, 72mm printable, Font A (12x24).
    pub const PAPER_80MM: Self = Self {
        name: String::new(),
        columns: 48,
        baud_rate: 9600,
        chunk_size: 512,
        cut_feed_lines: 3,
    };

    /// 58mm paper, 48mm printable, Font A (12x24).
    pub const PAPER_58MM: Self = Self {
        name: String::new(),
        columns: 32,
        baud_rate: 9600,
        chunk_size: 512,
        cut_feed_lines: 3,
    };

    /// Look up a preset by paper width name ("80mm", "58mm").
    pub fn preset(name: &str) -> Option<Self> {
        let mut config = match name.to_lowercase().as_str() {
            "80mm" | "80" => Self::PAPER_80MM,
            "58mm" | "58" => Self::PAPER_58MM,
            _ => return None,
        };
        config.name = name.to_lowercase();
        Some(config)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: "80mm".to_string(),
            ..Self::PAPER_80MM
        }
    }
}
