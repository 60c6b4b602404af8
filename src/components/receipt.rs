//! # Receipt Component
//!
//! The root container for building receipts.

use super::Component;
use crate::ir::Op;

/// Code table selected at the top of every receipt (PC437).
pub const DEFAULT_CODEPAGE: u8 = 0;

/// Receipt is the root container component.
///
/// It selects the code table, holds child components and optionally feeds
/// and cuts at the end.
///
/// ## Example
///
/// ```
/// use boleta::components::*;
///
/// let receipt = Receipt::new()
///     .child(Text::new("STORE NAME").center().bold())
///     .child(Divider::dashed())
///     .child(Columns::new("Item", "$9.99"))
///     .cut();
///
/// let bytes = receipt.build();
/// ```
pub struct Receipt {
    children: Vec<Box<dyn Component>>,
    codepage: Option<u8>,
    cut: Option<Cut>,
}

struct Cut {
    partial: bool,
    feed_lines: u8,
}

impl Default for Receipt {
    fn default() -> Self {
        Self::new()
    }
}

impl Receipt {
    /// Create a new empty receipt using the PC437 code table.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            codepage: Some(DEFAULT_CODEPAGE),
            cut: None,
        }
    }

    /// Select a different code table, or `None` to keep the printer default.
    pub fn codepage(mut self, page: Option<u8>) -> Self {
        self.codepage = page;
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

    /// Feed three lines and cut fully at the end.
    pub fn cut(self) -> Self {
        self.cut_after(3, false)
    }

    /// Feed `feed_lines` lines and cut at the end.
    pub fn cut_after(mut self, feed_lines: u8, partial: bool) -> Self {
        self.cut = Some(Cut {
            partial,
            feed_lines,
        });
        self
    }
}

impl Component for Receipt {
    fn emit(&self, ops: &mut Vec<Op>) {
        if let Some(page) = self.codepage {
            ops.push(Op::SetCodepage(page));
        }

        for child in &self.children {
            child.emit(ops);
        }

        if let Some(cut) = &self.cut {
            ops.push(Op::Cut {
                partial: cut.partial,
                feed_lines: cut.feed_lines,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentExt, Text};

    #[test]
    fn test_empty_receipt() {
        let ir = Receipt::new().compile();
        assert_eq!(ir.ops, vec![Op::Init, Op::SetCodepage(0)]);
    }

    #[test]
    fn test_receipt_without_codepage() {
        let ir = Receipt::new().codepage(None).compile();
        assert_eq!(ir.ops, vec![Op::Init]);
    }

    #[test]
    fn test_receipt_with_cut() {
        let ir = Receipt::new().cut().compile();
        assert_eq!(
            ir.ops.last(),
            Some(&Op::Cut {
                partial: false,
                feed_lines: 3
            })
        );
    }

    #[test]
    fn test_receipt_children_in_order() {
        let ir = Receipt::new()
            .children(vec![Text::new("one"), Text::new("two")])
            .compile();
        assert_eq!(ir.text_lines(), vec!["one", "two"]);
    }
}
