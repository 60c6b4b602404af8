//! # Print Orchestrator
//!
//! Decides, per print request, whether the receipt goes to the paired
//! printer or to the host print dialog.
//!
//! ```text
//!                 connect() ok
//!   ┌──────────┐ ─────────────────► ┌─────────────────┐
//!   │ NoDevice │                    │ DeviceConnected │
//!   └──────────┘ ◄───────────────── └─────────────────┘
//!                 disconnect() / write failure
//!
//!   print() in NoDevice        : render compact ──► print dialog
//!   print() in DeviceConnected : encode ──► write
//! ```
//!
//! The state is read from the transport on every call, never cached.

use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::config::{CompanyProfile, PrintPolicy, Settings};
use crate::encoder;
use crate::error::{ConnectionError, PrintError, TransmissionError};
use crate::fallback::{self, Layout, PrintSurface};
use crate::invoice::InvoiceModel;
use crate::transport::{DeviceTransport, SerialHost};

/// Whether a printer is paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterState {
    NoDevice,
    DeviceConnected,
}

/// How a print request was fulfilled.
#[derive(Debug)]
pub enum PrintOutcome {
    /// The command stream was written to the printer
    Printed { bytes: usize },
    /// No printer was paired; the print dialog was opened
    Fallback,
    /// The printer write failed and the policy allowed a dialog print
    /// afterwards. Part of the receipt may already be on paper.
    FallbackAfterFailure(TransmissionError),
}

/// Sequences encoding, transmission and fallback rendering.
pub struct PrintOrchestrator {
    transport: DeviceTransport,
    surface: Box<dyn PrintSurface>,
    company: CompanyProfile,
    policy: PrintPolicy,
}

impl PrintOrchestrator {
    pub fn new(
        transport: DeviceTransport,
        surface: impl PrintSurface + 'static,
        company: CompanyProfile,
        policy: PrintPolicy,
    ) -> Self {
        Self {
            transport,
            surface: Box::new(surface),
            company,
            policy,
        }
    }

    /// Build an orchestrator from loaded settings.
    pub fn from_settings(
        host: impl SerialHost + 'static,
        surface: impl PrintSurface + 'static,
        settings: Settings,
    ) -> Self {
        let transport = DeviceTransport::new(host, settings.printer);
        Self::new(transport, surface, settings.company, settings.policy)
    }

    pub fn state(&self) -> PrinterState {
        if self.transport.is_connected() {
            PrinterState::DeviceConnected
        } else {
            PrinterState::NoDevice
        }
    }

    pub fn transport(&self) -> &DeviceTransport {
        &self.transport
    }

    pub fn policy(&self) -> &PrintPolicy {
        &self.policy
    }

    /// Pair with a printer.
    ///
    /// Cancelling the device choice or lacking serial support is not a
    /// failure of the orchestrator: it stays in [`PrinterState::NoDevice`]
    /// and later prints use the fallback. The error is still returned so the
    /// caller can tell the user.
    #[instrument(skip(self))]
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        match self.transport.connect().await {
            Ok(()) => {
                info!(state = ?self.state(), "Printer paired");
                Ok(())
            }
            Err(e) if e.is_fallback() => {
                info!(reason = %e, "No printer paired, prints will use the print dialog");
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "Pairing failed");
                Err(e)
            }
        }
    }

    /// Unpair. Safe in any state.
    pub async fn disconnect(&mut self) {
        let was = self.state();
        self.transport.disconnect().await;
        if was == PrinterState::DeviceConnected {
            info!("Printer unpaired");
        }
    }

    /// Print one invoice.
    #[instrument(skip_all, fields(invoice = %invoice.invoice_number, state = ?self.state()))]
    pub async fn print(&mut self, invoice: &InvoiceModel) -> Result<PrintOutcome, PrintError> {
        match self.state() {
            PrinterState::DeviceConnected => self.print_to_device(invoice).await,
            PrinterState::NoDevice => {
                self.print_fallback(invoice).await?;
                Ok(PrintOutcome::Fallback)
            }
        }
    }

    async fn print_to_device(&mut self, invoice: &InvoiceModel) -> Result<PrintOutcome, PrintError> {
        let bytes = encoder::encode_bytes(invoice, &self.company, self.transport.config());

        match self.transport.write(&bytes).await {
            Ok(()) => {
                info!(bytes = bytes.len(), "Receipt sent to printer");
                Ok(PrintOutcome::Printed { bytes: bytes.len() })
            }
            Err(e) if self.policy.fallback_on_transmission_error => {
                warn!(error = %e, "Printer write failed, opening print dialog instead");
                match self.print_fallback(invoice).await {
                    Ok(()) => Ok(PrintOutcome::FallbackAfterFailure(e)),
                    Err(surface) => {
                        error!(error = %surface, "Fallback after write failure also failed");
                        Err(PrintError::Transmission(e))
                    }
                }
            }
            Err(e) => Err(PrintError::Transmission(e)),
        }
    }

    async fn print_fallback(&self, invoice: &InvoiceModel) -> Result<(), PrintError> {
        let document = fallback::render(invoice, &self.company, Layout::Compact);
        let teardown = Duration::from_millis(self.policy.surface_teardown_ms);
        fallback::print_document(self.surface.as_ref(), &document, teardown).await?;
        Ok(())
    }
}
