//! # Intermediate Representation (IR)
//!
//! The IR is the command stream of a receipt: a "bytecode" that sits between
//! the receipt components and raw ESC/POS bytes.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────┐
//! │ Components  │ ──► │     IR      │ ──► │ Codegen  │
//! │(declarative)│     │  (Vec<Op>)  │     │ (bytes)  │
//! └─────────────┘     └─────────────┘     └──────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use boleta::ir::{Op, Program};
//! use boleta::protocol::text::Alignment;
//!
//! let mut program = Program::with_init();
//! program.push(Op::SetAlign(Alignment::Center));
//! program.push(Op::SetBold(true));
//! program.push(Op::Text("HELLO".into()));
//! program.push(Op::Newline);
//! program.push(Op::SetBold(false));
//! program.push(Op::Cut { partial: false, feed_lines: 3 });
//!
//! assert_eq!(program.text_lines(), vec!["HELLO"]);
//! let bytes = program.to_bytes();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

mod codegen;
mod ops;

pub use ops::*;
