//! # Declarative Components
//!
//! Building blocks the receipt encoder composes into a command stream.
//!
//! Instead of imperative commands, you describe *what* you want:
//!
//! ```
//! use boleta::components::*;
//!
//! let receipt = Receipt::new()
//!     .child(Text::new("KIOSKO NORTE").center().bold().double_height())
//!     .child(Divider::dashed())
//!     .child(Columns::new("2 x $2.25", "$4.50"))
//!     .child(Columns::new("TOTAL:", "$4.50").bold())
//!     .cut();
//!
//! // Compile to IR (inspectable)
//! let ir = receipt.compile();
//! assert_eq!(ir.text_lines()[0], "KIOSKO NORTE");
//!
//! // Generate bytes
//! let bytes = receipt.build();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```
//!
//! ## Component Trait
//!
//! All components implement the `Component` trait, which emits IR ops.
//! Containers ([`Receipt`], [`Span`]) hold children and bracket them with
//! the style changes they own.

mod layout;
mod receipt;
mod text;

pub use layout::*;
pub use receipt::*;
pub use text::*;

use crate::ir::{Op, Program};

/// Trait for declarative components.
///
/// Components emit IR ops when compiled. A component that switches a style
/// on must switch it off again before returning.
pub trait Component {
    /// Emit IR ops for this component into the ops vector.
    fn emit(&self, ops: &mut Vec<Op>);
}

/// Extension trait for compiling components.
pub trait ComponentExt: Component {
    /// Compile this component to an IR program.
    ///
    /// The program starts with an Init op, followed by the component's ops.
    fn compile(&self) -> Program {
        let mut ops = vec![Op::Init];
        self.emit(&mut ops);
        Program { ops }
    }

    /// Compile and generate bytes.
    fn build(&self) -> Vec<u8> {
        self.compile().to_bytes()
    }
}

// Blanket implementation for all components
impl<T: Component> ComponentExt for T {}

// Allow boxed components
impl Component for Box<dyn Component> {
    fn emit(&self, ops: &mut Vec<Op>) {
        self.as_ref().emit(ops);
    }
}

// Allow references to components
impl<T: Component + ?Sized> Component for &T {
    fn emit(&self, ops: &mut Vec<Op>) {
        (*self).emit(ops);
    }
}
