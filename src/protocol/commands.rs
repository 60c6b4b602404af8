//! # ESC/POS Printer Commands
//!
//! This module implements the basic ESC/POS control commands understood by
//! most 58mm and 80mm thermal receipt printers (Epson TM series and the many
//! compatible serial/Bluetooth printers).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - With parameters: `ESC t n`, `GS V m n`
//!
//! ## Reference
//!
//! Based on the "ESC/POS Application Programming Guide" command set.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Most ESC/POS commands begin with ESC (0x1B).
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size, cutter and graphics commands.
/// - Hex: 0x1D, Decimal: 29
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets the printer to its power-on modes.
/// Sent at the start of every job so a previous job's styles cannot leak.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## What Gets Reset
///
/// - Emphasis, character size and alignment
/// - Line spacing
/// - Character code table (back to the DIP-switch default)
///
/// ## Example
///
/// ```
/// use boleta::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// CUTTER CONTROL COMMANDS
// ============================================================================

/// # Feed Then Cut (GS V 66 n / GS V 65 n)
///
/// Feeds `lines` lines past the cutter, then cuts. The printer accounts for
/// the head-to-cutter distance itself, so the last printed line is never cut
/// through.
///
/// ## Protocol Details
///
/// | Variant | Bytes        |
/// |---------|--------------|
/// | Full    | 1D 56 42 n   |
/// | Partial | 1D 56 41 n   |
///
/// ## Example
///
/// ```
/// use boleta::protocol::commands;
///
/// assert_eq!(commands::cut_feed(3, false), vec![0x1D, 0x56, 0x42, 3]);
/// ```
#[inline]
pub fn cut_feed(lines: u8, partial: bool) -> Vec<u8> {
    let mode = if partial { 65 } else { 66 };
    vec![GS, b'V', mode, lines]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_cut_feed() {
        assert_eq!(cut_feed(4, false), vec![0x1D, 0x56, 0x42, 0x04]);
        assert_eq!(cut_feed(4, true), vec![0x1D, 0x56, 0x41, 0x04]);
    }
}
