//! # ESC/POS Text Styling Commands
//!
//! This module implements the text formatting commands used on receipts.
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Alignment | ESC a n | Left / center / right |
//! | Bold | ESC E n | **Emphasized** text |
//! | Size | GS ! n | 1x-8x width and height |
//! | Code table | ESC t n | Character set for bytes 0x80-0xFF |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```

use super::commands::{ESC, GS};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// Only takes effect at the beginning of a line.
///
/// ## Example
///
/// ```
/// use boleta::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// TEXT EMPHASIS (BOLD)
// ============================================================================

/// # Turn Emphasized Mode On (ESC E 1)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC E 1  |
/// | Hex     | 1B 45 01 |
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 1]
}

/// # Turn Emphasized Mode Off (ESC E 0)
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// # Select Character Size (GS ! n)
///
/// Sets width and height magnification for subsequent characters.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS ! n   |
/// | Hex     | 1D 21 n  |
///
/// Bits 4-6 of `n` hold the width multiplier minus one, bits 0-2 the height
/// multiplier minus one. Both parameters are clamped to 0..=7.
///
/// ## Example
///
/// ```
/// use boleta::protocol::text::size;
///
/// // Double height, normal width
/// assert_eq!(size(1, 0), vec![0x1D, 0x21, 0x01]);
/// // Double width and height
/// assert_eq!(size(1, 1), vec![0x1D, 0x21, 0x11]);
/// ```
pub fn size(height_mult: u8, width_mult: u8) -> Vec<u8> {
    let h = height_mult.min(7);
    let w = width_mult.min(7);
    vec![GS, b'!', (w << 4) | h]
}

/// Normal 1x1 character size
#[inline]
pub fn size_normal() -> Vec<u8> {
    size(0, 0)
}

// ============================================================================
// CODE TABLE
// ============================================================================

/// # Select Character Code Table (ESC t n)
///
/// `n = 0` selects PC437 (USA, Standard Europe), which is what
/// [`super::cp437::encode`] produces.
#[inline]
pub fn codepage(n: u8) -> Vec<u8> {
    vec![ESC, b't', n]
}

// ============================================================================
// STYLE RESET
// ============================================================================

/// Reset the styles a receipt block may have changed, without clearing the
/// print buffer the way `ESC @` would.
///
/// Emits size normal, bold off, left alignment, in that order.
pub fn reset_style() -> Vec<u8> {
    let mut out = size_normal();
    out.extend(bold_off());
    out.extend(align(Alignment::Left));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold_on(), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold_off(), vec![0x1B, 0x45, 0x00]);
    }

    #[test]
    fn test_size() {
        assert_eq!(size_normal(), vec![0x1D, 0x21, 0x00]);
        assert_eq!(size(1, 0), vec![0x1D, 0x21, 0x01]);
        assert_eq!(size(0, 1), vec![0x1D, 0x21, 0x10]);
    }

    #[test]
    fn test_size_clamps() {
        assert_eq!(size(9, 12), vec![0x1D, 0x21, 0x77]);
    }

    #[test]
    fn test_codepage() {
        assert_eq!(codepage(0), vec![0x1B, 0x74, 0x00]);
    }

    #[test]
    fn test_reset_style() {
        assert_eq!(
            reset_style(),
            vec![0x1D, 0x21, 0x00, 0x1B, 0x45, 0x00, 0x1B, 0x61, 0x00]
        );
    }
}
