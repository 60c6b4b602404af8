//! # Command Encoder
//!
//! Maps an invoice to the ESC/POS command stream for one receipt.
//!
//! The receipt is assembled from components, block by block, in a fixed
//! order. Each block owns its formatting and leaves the printer in plain,
//! left-aligned text when it ends:
//!
//! ```text
//! Init, code page
//! Header     center, bold, double height, blank line, reset
//! Metadata   left, bold
//! Customer   bold CLIENT:, name, [email], [street / city, state / zip]
//! Items      bold ARTICLES:, per item: bold name, qty x unit | total, [tax]
//! Totals     divider, Subtotal, [Tax], divider, bold double height TOTAL
//! Footer     center, thank-you, brand, date
//! Feed + cut
//! ```
//!
//! ## Example
//!
//! ```
//! use boleta::config::CompanyProfile;
//! use boleta::encoder;
//! use boleta::invoice::InvoiceModel;
//!
//! let invoice = InvoiceModel::from_json(r#"{
//!     "_id": "inv-1", "invoiceNumber": "F-0001",
//!     "issuedAt": "2024-03-05T14:30:00Z", "status": "paid",
//!     "order": "O1", "customer": {"_id": "c-1", "name": "Ana"},
//!     "products": [], "subtotal": 0, "totalTax": 0, "total": 0
//! }"#)?;
//!
//! let program = encoder::encode(&invoice, &CompanyProfile::default());
//! assert!(program.text_lines().contains(&"Order: O1".to_string()));
//! # Ok::<(), boleta::error::InvoiceError>(())
//! ```

use crate::components::*;
use crate::config::CompanyProfile;
use crate::content::{labels, CustomerBlock, Footer, ItemBlock, Metadata, ReceiptContent, TotalsBlock};
use crate::invoice::InvoiceModel;
use crate::ir::Program;
use crate::printer::PrinterConfig;

/// Encode an invoice for the default 80mm printer.
pub fn encode(invoice: &InvoiceModel, company: &CompanyProfile) -> Program {
    encode_for(invoice, company, &PrinterConfig::default())
}

/// Encode an invoice for a specific printer.
///
/// The printer only affects line width and the feed before the cut.
pub fn encode_for(
    invoice: &InvoiceModel,
    company: &CompanyProfile,
    printer: &PrinterConfig,
) -> Program {
    let content = ReceiptContent::build(invoice, company);
    receipt(&content, printer).compile()
}

/// Encode an invoice straight to bytes.
pub fn encode_bytes(
    invoice: &InvoiceModel,
    company: &CompanyProfile,
    printer: &PrinterConfig,
) -> Vec<u8> {
    encode_for(invoice, company, printer).to_bytes()
}

/// Assemble the receipt component tree.
pub fn receipt(content: &ReceiptContent, printer: &PrinterConfig) -> Receipt {
    let width = printer.columns;

    Receipt::new()
        .child(header(&content.header))
        .child(metadata(&content.metadata))
        .child(customer(&content.customer))
        .child(items(&content.items, width))
        .child(totals(&content.totals, width))
        .child(footer(&content.footer))
        .cut_after(printer.cut_feed_lines, false)
}

fn header(lines: &[String]) -> Span {
    Span::new()
        .center()
        .bold()
        .double_height()
        .reset_after()
        .children(lines.iter().map(Text::new))
        .child(BlankLine)
}

fn metadata(metadata: &Metadata) -> Span {
    Span::new()
        .left()
        .bold()
        .children(metadata.lines().into_iter().map(Text::new))
}

fn customer(customer: &CustomerBlock) -> Span {
    let mut block = Span::new()
        .child(Text::new(labels::CLIENT).bold())
        .child(Text::new(&customer.name))
        .child_opt(customer.email_line.as_ref().map(Text::new));

    if let Some(address) = &customer.address_lines {
        block = block.children(address.iter().map(Text::new));
    }

    block.child(BlankLine)
}

fn items(items: &[ItemBlock], width: usize) -> Span {
    let mut block = Span::new().child(Text::new(labels::ARTICLES).bold());

    for item in items {
        block = block
            .child(Text::new(&item.name).bold())
            .child(Columns::new(item.quantity_line(), &item.line_total).width(width))
            .child_opt(
                item.tax_note
                    .as_ref()
                    .map(|note| Text::new(format!("  {}", note))),
            )
            .child(BlankLine);
    }

    block
}

fn totals(totals: &TotalsBlock, width: usize) -> Span {
    Span::new()
        .child(Divider::dashed().width(width))
        .child(Columns::new(labels::SUBTOTAL, &totals.subtotal).width(width))
        .child_opt(
            totals
                .tax
                .as_ref()
                .map(|tax| Columns::new(labels::TAX, tax).width(width)),
        )
        .child(Divider::dashed().width(width))
        .child(
            Columns::new(labels::TOTAL, &totals.total)
                .width(width)
                .bold()
                .double_height(),
        )
}

fn footer(footer: &Footer) -> Span {
    Span::new()
        .center()
        .child(BlankLine)
        .children(footer.lines.iter().map(Text::new))
        .child(Text::new(&footer.issued))
}
