//! # Boleta - Invoice Receipts for ESC/POS Printers
//!
//! Boleta turns an invoice into a printed receipt. It provides:
//!
//! - **Invoice intake**: JSON parsing and validation into [`InvoiceModel`]
//! - **Command encoding**: ESC/POS command streams built from declarative
//!   components, inspectable as IR before they become bytes
//! - **Transport**: a user-paired serial printer (USB, RFCOMM, UART)
//! - **Fallback rendering**: the same receipt as an HTML page for the host
//!   print dialog when no printer is paired
//! - **Orchestration**: one `print` call that picks the right path
//!
//! ## Quick Start
//!
//! ```no_run
//! use boleta::{
//!     config::Settings,
//!     fallback::SystemPrintSurface,
//!     invoice::InvoiceModel,
//!     orchestrator::PrintOrchestrator,
//!     transport::TtyHost,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), boleta::BoletaError> {
//! let invoice = InvoiceModel::from_json(&std::fs::read_to_string("invoice.json")?)?;
//!
//! let mut orchestrator = PrintOrchestrator::from_settings(
//!     TtyHost::fixed("/dev/ttyUSB0"),
//!     SystemPrintSurface::new(),
//!     Settings::default(),
//! );
//!
//! // Without a paired printer, print() opens the print dialog instead
//! let _ = orchestrator.connect().await;
//! let outcome = orchestrator.print(&invoice).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`invoice`] | Invoice model and JSON intake |
//! | [`content`] | Formatted receipt content shared by both outputs |
//! | [`encoder`] | Invoice to ESC/POS command stream |
//! | [`components`] | Declarative receipt building blocks |
//! | [`ir`] | Inspectable command stream and codegen |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Serial device connection |
//! | [`fallback`] | HTML document rendering and print surfaces |
//! | [`orchestrator`] | Printer-or-dialog decision |
//! | [`config`] | Settings file |
//! | [`printer`] | Printer hardware presets |
//! | [`error`] | Error types |

pub mod components;
pub mod config;
pub mod content;
pub mod encoder;
pub mod error;
pub mod fallback;
pub mod format;
pub mod invoice;
pub mod ir;
pub mod orchestrator;
pub mod printer;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use error::BoletaError;
pub use invoice::InvoiceModel;
pub use orchestrator::{PrintOrchestrator, PrintOutcome};
pub use printer::PrinterConfig;
pub use transport::DeviceTransport;
