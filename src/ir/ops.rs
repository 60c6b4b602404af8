//! # IR Opcodes
//!
//! This module defines the command stream for receipt printing. The IR is a
//! sequence of opcodes that can be inspected in tests and compiled to ESC/POS
//! bytes.
//!
//! ```text
//! Components → IR (inspectable) → Codegen → Bytes
//! ```
//!
//! Each opcode represents a single, atomic operation. Style changes are
//! individual ops so that the bracketing of bold, size and alignment spans
//! stays visible in the program.

use crate::protocol::text::Alignment;

/// Text formatting state reached after running a sequence of ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleState {
    pub alignment: Alignment,
    pub bold: bool,
    pub height_mult: u8,
    pub width_mult: u8,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            alignment: Alignment::Left,
            bold: false,
            height_mult: 0,
            width_mult: 0,
        }
    }
}

impl StyleState {
    /// Whether every style is back to its power-on value.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Apply one op to this state.
    pub fn apply(&mut self, op: &Op) {
        match op {
            Op::Init | Op::ResetStyle => *self = Self::default(),
            Op::SetAlign(alignment) => self.alignment = *alignment,
            Op::SetBold(enabled) => self.bold = *enabled,
            Op::SetSize { height, width } => {
                self.height_mult = *height;
                self.width_mult = *width;
            }
            _ => {}
        }
    }
}

/// IR opcodes - the "bytecode" for receipt printing.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    // ========== Printer Control ==========
    /// Initialize printer (ESC @). Resets to default state.
    Init,

    /// Select the character code table (ESC t n).
    SetCodepage(u8),

    /// Feed `feed_lines` lines, then cut. `partial: true` leaves a small hinge.
    Cut { partial: bool, feed_lines: u8 },

    // ========== Style Changes ==========
    /// Set text alignment.
    SetAlign(Alignment),

    /// Enable/disable bold.
    SetBold(bool),

    /// Set character size multiplier (GS ! n).
    /// height/width: 0 = 1x, 1 = 2x, ... 7 = 8x
    SetSize { height: u8, width: u8 },

    /// Reset size, bold and alignment to default.
    ResetStyle,

    // ========== Content ==========
    /// Text (no trailing newline). Transcoded to PC437 at codegen.
    Text(String),

    /// Line feed (newline).
    Newline,
}

/// A compiled IR program: the command stream for one receipt.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Create a program with an initial Init op.
    pub fn with_init() -> Self {
        Self {
            ops: vec![Op::Init],
        }
    }

    /// Add an op to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Add multiple ops to the program.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Get the number of ops in the program.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    /// The printed text, one entry per line feed.
    ///
    /// Text ops are joined until the next `Newline`; blank lines come out as
    /// empty strings. Trailing text without a newline is kept as a last line.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for op in &self.ops {
            match op {
                Op::Text(s) => current.push_str(s),
                Op::Newline => lines.push(std::mem::take(&mut current)),
                _ => {}
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// The style state after the whole program has run.
    pub fn final_style(&self) -> StyleState {
        let mut state = StyleState::default();
        for op in &self.ops {
            state.apply(op);
        }
        state
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
