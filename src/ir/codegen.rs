//! # Code Generation
//!
//! Converts IR programs to ESC/POS protocol bytes.

use super::ops::{Op, Program};
use crate::protocol::{commands, cp437, text};

impl Program {
    /// Compile the IR program to ESC/POS bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for op in &self.ops {
            match op {
                // ===== Printer Control =====
                Op::Init => {
                    out.extend(commands::init());
                }
                Op::SetCodepage(page) => {
                    out.extend(text::codepage(*page));
                }
                Op::Cut {
                    partial,
                    feed_lines,
                } => {
                    out.extend(commands::cut_feed(*feed_lines, *partial));
                }

                // ===== Style Changes =====
                Op::SetAlign(align) => {
                    out.extend(text::align(*align));
                }
                Op::SetBold(enabled) => {
                    if *enabled {
                        out.extend(text::bold_on());
                    } else {
                        out.extend(text::bold_off());
                    }
                }
                Op::SetSize { height, width } => {
                    out.extend(text::size(*height, *width));
                }
                Op::ResetStyle => {
                    out.extend(text::reset_style());
                }

                // ===== Content =====
                Op::Text(s) => {
                    out.extend(cp437::encode(s));
                }
                Op::Newline => {
                    out.push(commands::LF);
                }
            }
        }

        out
    }
}
