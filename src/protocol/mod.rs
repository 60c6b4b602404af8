//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS protocol
//! spoken by serial and Bluetooth thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, cut, feed)
//! - [`text`]: Text styling (alignment, bold, character size, code table)
//! - [`cp437`]: Unicode to PC437 transcoding for printable text
//!
//! ## Usage Example
//!
//! ```
//! use boleta::protocol::{commands, cp437, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(text::bold_on());
//! data.extend(cp437::encode("RECEIPT\n"));
//! data.extend(text::bold_off());
//! data.extend(text::align(text::Alignment::Left));
//! data.extend(commands::cut_feed(3, false));
//! ```

pub mod commands;
pub mod cp437;
pub mod text;
