//! # Layout Components
//!
//! Components for controlling layout and spacing.

use super::Component;
use crate::ir::Op;
use crate::protocol::text::Alignment;

/// Default characters per line (80mm paper, Font A).
pub const DEFAULT_COLUMNS: usize = 48;

/// A horizontal rule of dashes.
///
/// ## Example
///
/// ```
/// use boleta::components::Divider;
///
/// let rule = Divider::dashed().width(32);
/// ```
pub struct Divider {
    width: usize,
}

impl Divider {
    /// Create a dashed divider.
    pub fn dashed() -> Self {
        Self {
            width: DEFAULT_COLUMNS,
        }
    }

    /// Set the character width.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

impl Default for Divider {
    fn default() -> Self {
        Self::dashed()
    }
}

impl Component for Divider {
    fn emit(&self, ops: &mut Vec<Op>) {
        ops.push(Op::Text("-".repeat(self.width)));
        ops.push(Op::Newline);
    }
}

/// An empty line.
pub struct BlankLine;

impl Component for BlankLine {
    fn emit(&self, ops: &mut Vec<Op>) {
        ops.push(Op::Newline);
    }
}

/// A two-column row: left text, right text flush with the line end.
///
/// When both sides do not fit, they are separated by a single space and the
/// printer wraps the line.
///
/// ## Example
///
/// ```
/// use boleta::components::{Columns, ComponentExt};
///
/// let row = Columns::new("Subtotal:", "$19.99").width(20);
/// assert_eq!(row.compile().text_lines(), vec!["Subtotal:     $19.99"]);
/// ```
pub struct Columns {
    left: String,
    right: String,
    width: usize,
    bold: bool,
    double_height: bool,
}

impl Columns {
    /// Create a two-column row.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            width: DEFAULT_COLUMNS,
            bold: false,
            double_height: false,
        }
    }

    /// Set the character width.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Make the row bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Print the row at double height.
    pub fn double_height(mut self) -> Self {
        self.double_height = true;
        self
    }

    fn line(&self) -> String {
        let used = self.left.chars().count() + self.right.chars().count();
        let gap = if used < self.width {
            self.width - used
        } else {
            1
        };
        format!("{}{}{}", self.left, " ".repeat(gap), self.right)
    }
}

impl Component for Columns {
    fn emit(&self, ops: &mut Vec<Op>) {
        if self.bold {
            ops.push(Op::SetBold(true));
        }
        if self.double_height {
            ops.push(Op::SetSize {
                height: 1,
                width: 0,
            });
        }
        ops.push(Op::Text(self.line()));
        ops.push(Op::Newline);
        if self.double_height {
            ops.push(Op::SetSize {
                height: 0,
                width: 0,
            });
        }
        if self.bold {
            ops.push(Op::SetBold(false));
        }
    }
}

/// How a [`Span`] restores formatting when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanClose {
    /// Undo exactly the styles the span set, in reverse order.
    #[default]
    Undo,
    /// Emit a single style reset (size, bold, alignment).
    Reset,
}

/// A block of children sharing alignment, weight and size.
///
/// The span sets its styles once, emits its children, then restores the
/// defaults before returning, so the next block always starts from plain
/// left-aligned text.
///
/// ## Example
///
/// ```
/// use boleta::components::*;
/// use boleta::ir::Op;
///
/// let header = Span::new()
///     .center()
///     .bold()
///     .child(Text::new("KIOSKO NORTE"))
///     .child(Text::new("Since 1998"));
///
/// let ir = header.compile();
/// assert!(ir.final_style().is_plain());
/// ```
pub struct Span {
    alignment: Option<Alignment>,
    bold: bool,
    double_height: bool,
    close: SpanClose,
    children: Vec<Box<dyn Component>>,
}

impl Default for Span {
    fn default() -> Self {
        Self::new()
    }
}

impl Span {
    /// Create an empty span with no styling.
    pub fn new() -> Self {
        Self {
            alignment: None,
            bold: false,
            double_height: false,
            close: SpanClose::Undo,
            children: Vec::new(),
        }
    }

    /// Center every child line.
    pub fn center(mut self) -> Self {
        self.alignment = Some(Alignment::Center);
        self
    }

    /// Left-align every child line.
    pub fn left(mut self) -> Self {
        self.alignment = Some(Alignment::Left);
        self
    }

    /// Emphasize every child line.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Print every child line at double height.
    pub fn double_height(mut self) -> Self {
        self.double_height = true;
        self
    }

    /// Close the span with a single style reset.
    pub fn reset_after(mut self) -> Self {
        self.close = SpanClose::Reset;
        self
    }

    /// Add a child component.
    pub fn child<C: Component + 'static>(mut self, component: C) -> Self {
        self.children.push(Box::new(component));
        self
    }

    /// Add multiple child components.
    pub fn children<I, C>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Component + 'static,
    {
        for c in components {
            self.children.push(Box::new(c));
        }
        self
    }

    /// Add a child only when `component` is `Some`.
    pub fn child_opt<C: Component + 'static>(self, component: Option<C>) -> Self {
        match component {
            Some(c) => self.child(c),
            None => self,
        }
    }
}

impl Component for Span {
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

        for child in &self.children {
            child.emit(ops);
        }

        match self.close {
            SpanClose::Reset => ops.push(Op::ResetStyle),
            SpanClose::Undo => {
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentExt, Text};

    #[test]
    fn test_divider_width() {
        let ir = Divider::dashed().width(8).compile();
        assert_eq!(ir.text_lines(), vec!["--------"]);
    }

    #[test]
    fn test_columns_padding() {
        let ir = Columns::new("2 x $5.00", "$10.00").width(24).compile();
        let lines = ir.text_lines();
        assert_eq!(lines[0], "2 x $5.00         $10.00");
        assert_eq!(lines[0].len(), 24);
    }

    #[test]
    fn test_columns_overflow_keeps_one_space() {
        let ir = Columns::new("A very long label", "$1.00").width(10).compile();
        assert_eq!(ir.text_lines(), vec!["A very long label $1.00"]);
    }

    #[test]
    fn test_columns_counts_chars_not_bytes() {
        let ir = Columns::new("Café", "$1.00").width(12).compile();
        assert_eq!(ir.text_lines()[0].chars().count(), 12);
    }

    #[test]
    fn test_span_undo_order() {
        let ir = Span::new()
            .center()
            .bold()
            .child(Text::new("x"))
            .compile();
        assert_eq!(
            ir.ops,
            vec![
                Op::Init,
                Op::SetAlign(Alignment::Center),
                Op::SetBold(true),
                Op::Text("x".into()),
                Op::Newline,
                Op::SetBold(false),
                Op::SetAlign(Alignment::Left),
            ]
        );
    }

    #[test]
    fn test_span_reset_close() {
        let ir = Span::new()
            .center()
            .bold()
            .double_height()
            .reset_after()
            .child(Text::new("x"))
            .compile();
        assert_eq!(ir.ops.last(), Some(&Op::ResetStyle));
        assert!(ir.final_style().is_plain());
    }

    #[test]
    fn test_span_child_opt() {
        let none: Option<Text> = None;
        let ir = Span::new()
            .child_opt(none)
            .child_opt(Some(Text::new("kept")))
            .compile();
        assert_eq!(ir.text_lines(), vec!["kept"]);
    }
}
