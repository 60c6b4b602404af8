//! # Invoice Model
//!
//! The invoice snapshot both output paths consume, and its JSON intake.
//!
//! ```text
//! JSON ──► schema (serde, all optional) ──► convert (validate) ──► InvoiceModel
//! ```
//!
//! ## Example
//!
//! ```
//! use boleta::invoice::InvoiceModel;
//!
//! let invoice = InvoiceModel::from_json(r#"{
//!     "_id": "inv-1",
//!     "invoiceNumber": "F-0001",
//!     "issuedAt": "2024-03-05T14:30:00Z",
//!     "status": "paid",
//!     "order": {"_id": "O1"},
//!     "customer": {"_id": "c-1", "name": "Ana"},
//!     "products": [],
//!     "subtotal": 0, "totalTax": 0, "total": 0
//! }"#)?;
//!
//! assert_eq!(invoice.order_id(), "O1");
//! # Ok::<(), boleta::error::InvoiceError>(())
//! ```

mod convert;
mod model;
pub mod schema;

pub use model::*;
