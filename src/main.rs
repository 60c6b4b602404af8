//! # Boleta CLI
//!
//! Command-line interface for printing invoice receipts.
//!
//! ## Usage
//!
//! ```bash
//! # Write the ESC/POS command stream to a file
//! boleta encode invoice.json -o receipt.bin
//!
//! # Show the printable text of the command stream
//! boleta encode invoice.json --text
//!
//! # Render the fallback page
//! boleta render invoice.json --layout full -o receipt.html
//!
//! # Print on a serial printer, or through the print dialog without one
//! boleta print invoice.json --device /dev/ttyUSB0
//! boleta print invoice.json --pair
//! boleta print invoice.json
//!
//! # List serial devices
//! boleta ports
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (default `boleta=info`).

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::warn;

use boleta::{
    BoletaError, InvoiceModel, PrintOrchestrator, PrintOutcome,
    config::Settings,
    encoder,
    fallback::{self, Layout, RecordingSurface, SystemPrintSurface},
    orchestrator::PrinterState,
    transport::{LoopbackHost, TtyHost, tty},
};

/// Boleta - invoice receipts for ESC/POS printers
#[derive(Parser, Debug)]
#[command(name = "boleta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode an invoice to an ESC/POS command stream
    Encode {
        /// Invoice JSON file ("-" for stdin)
        invoice: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write a hex dump instead of raw bytes
        #[arg(long, conflicts_with = "text")]
        hex: bool,

        /// Write the printable text lines instead of raw bytes
        #[arg(long)]
        text: bool,
    },

    /// Render an invoice as the fallback HTML page
    Render {
        /// Invoice JSON file ("-" for stdin)
        invoice: PathBuf,

        /// Page layout: compact or full
        #[arg(long, default_value_t = Layout::Compact)]
        layout: Layout,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print an invoice on a paired printer, or through the print dialog
    Print {
        /// Invoice JSON file ("-" for stdin)
        invoice: PathBuf,

        /// Printer device path
        #[arg(long, conflicts_with = "pair")]
        device: Option<String>,

        /// Choose the printer interactively
        #[arg(long)]
        pair: bool,

        /// Use an in-memory printer and print surface
        #[arg(long)]
        dry_run: bool,
    },

    /// List serial devices a printer could be attached to
    Ports,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boleta=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoletaError> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Encode {
            invoice,
            output,
            hex,
            text,
        } => {
            let invoice = read_invoice(&invoice)?;
            let program = encoder::encode_for(&invoice, &settings.company, &settings.printer);

            let data = if text {
                let mut lines = program.text_lines().join("\n");
                lines.push('\n');
                lines.into_bytes()
            } else if hex {
                hex_dump(&program.to_bytes()).into_bytes()
            } else {
                program.to_bytes()
            };
            write_output(output.as_deref(), &data)?;
        }

        Commands::Render {
            invoice,
            layout,
            output,
        } => {
            let invoice = read_invoice(&invoice)?;
            let document = fallback::render(&invoice, &settings.company, layout);
            write_output(output.as_deref(), document.to_html().as_bytes())?;
        }

        Commands::Print {
            invoice,
            device,
            pair,
            dry_run,
        } => {
            let invoice = read_invoice(&invoice)?;
            let pair = pair || device.is_some();

            if dry_run {
                let host = LoopbackHost::new();
                let surface = RecordingSurface::new();
                let orchestrator =
                    PrintOrchestrator::from_settings(host.clone(), surface.clone(), settings);
                let outcome = print(orchestrator, &invoice, pair).await?;
                eprintln!(
                    "Dry run: {} bytes to printer, {} page(s) to print dialog",
                    host.written().len(),
                    surface.pages().len()
                );
                report(&outcome);
                return Ok(());
            }

            let host = match device {
                Some(path) => TtyHost::fixed(path),
                None => TtyHost::default(),
            };
            let orchestrator =
                PrintOrchestrator::from_settings(host, SystemPrintSurface::new(), settings);
            let outcome = print(orchestrator, &invoice, pair).await?;
            report(&outcome);
        }

        Commands::Ports => {
            let ports = tty::list_candidate_ports();
            if ports.is_empty() {
                println!("No serial devices found.");
            }
            for port in ports {
                println!("{}", port);
            }
        }
    }

    Ok(())
}

/// Pair when asked to, then print once.
async fn print(
    mut orchestrator: PrintOrchestrator,
    invoice: &InvoiceModel,
    pair: bool,
) -> Result<PrintOutcome, BoletaError> {
    if pair {
        if let Err(e) = orchestrator.connect().await {
            if !e.is_fallback() {
                return Err(e.into());
            }
            warn!("Continuing without a printer: {}", e);
        }
    }

    let result = orchestrator.print(invoice).await;
    if orchestrator.state() == PrinterState::DeviceConnected {
        orchestrator.disconnect().await;
    }
    Ok(result?)
}

fn report(outcome: &PrintOutcome) {
    match outcome {
        PrintOutcome::Printed { bytes } => println!("Printed ({} bytes).", bytes),
        PrintOutcome::Fallback => println!("No printer paired; opened the print dialog."),
        PrintOutcome::FallbackAfterFailure(e) => {
            println!("Printer failed ({}); opened the print dialog instead.", e)
        }
    }
}

fn read_invoice(path: &Path) -> Result<InvoiceModel, BoletaError> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        raw
    } else {
        fs::read_to_string(path)?
    };
    Ok(InvoiceModel::from_json(&raw)?)
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<(), BoletaError> {
    match path {
        Some(path) => fs::write(path, data)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Space-separated hex bytes, 16 per line.
fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for line in bytes.chunks(16) {
        let hex: Vec<String> = line.iter().map(|b| format!("{:02X}", b)).collect();
        out.push_str(&hex.join(" "));
        out.push('\n');
    }
    out
}
