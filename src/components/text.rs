//! # Text Components
//!
//! A single line of text with optional styling.

use super::Component;
use crate::ir::Op;
use crate::protocol::text::Alignment;

/// A text component with optional styling.
///
/// Styles switched on for the line are switched off again right after it,
/// in reverse order. A non-left alignment goes back to left.
///
/// ## Example
///
/// ```
/// use boleta::components::*;
///
/// let plain = Text::new("Espresso");
/// let title = Text::new("ARTICLES:").bold();
/// let banner = Text::new("KIOSKO NORTE").center().bold().double_height();
/// ```
pub struct Text {
    content: String,
    bold: bool,
    double_height: bool,
    alignment: Option<Alignment>,
}

impl Text {
    /// Create a new text line.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            bold: false,
            double_height: false,
            alignment: None,
        }
    }

    /// Make text bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Print at double height.
    pub fn double_height(mut self) -> Self {
        self.double_height = true;
        self
    }

    /// Set alignment.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Center the text.
    pub fn center(self) -> Self {
        self.align(Alignment::Center)
    }

    /// Left-align the text.
    pub fn left(self) -> Self {
        self.align(Alignment::Left)
    }
}

impl Component for Text {
    fn emit(&self, ops: &mut Vec<Op>) {
        if let Some(align) = self.alignment {
            ops.push(Op::SetAlign(align));
        }
        if self.bold {
            ops.push(Op::SetBold(true));
        }
        if self.double_height {
            ops.push(Op::SetSize {
                height: 1,
                width: 0,
            });
        }

        ops.push(Op::Text(self.content.clone()));
        ops.push(Op::Newline);

        // Reset styles that were changed (reverse order)
        if self.double_height {
            ops.push(Op::SetSize {
                height: 0,
                width: 0,
            });
        }
        if self.bold {
            ops.push(Op::SetBold(false));
        }
        if matches!(self.alignment, Some(a) if a != Alignment::Left) {
            ops.push(Op::SetAlign(Alignment::Left));
        }
    }
}
