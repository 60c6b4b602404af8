//! # Receipt Content
//!
//! The display content of one receipt, computed once from an
//! [`InvoiceModel`] and a [`CompanyProfile`] and consumed by both output
//! paths: the ESC/POS encoder and the fallback document renderer.
//!
//! Every string is already formatted and every optional section is already
//! decided here (customer email, address lines, per-item tax annotation, tax
//! total). The two outputs only choose how to style what they are given, so
//! they cannot disagree about which sections exist or in what order.

use crate::config::CompanyProfile;
use crate::format;
use crate::invoice::InvoiceModel;

/// Fixed labels printed on every receipt.
pub mod labels {
    pub const INVOICE: &str = "Invoice:";
    pub const DATE: &str = "Date:";
    pub const ORDER: &str = "Order:";
    pub const CLIENT: &str = "CLIENT:";
    pub const EMAIL: &str = "Email:";
    pub const ARTICLES: &str = "ARTICLES:";
    pub const SUBTOTAL: &str = "Subtotal:";
    pub const TAX: &str = "Tax:";
    pub const TOTAL: &str = "TOTAL:";
}

/// Everything printed on one receipt, in print order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptContent {
    /// Company name, tagline, phone, email, address (blank fields skipped)
    pub header: Vec<String>,
    pub metadata: Metadata,
    pub customer: CustomerBlock,
    pub items: Vec<ItemBlock>,
    pub totals: TotalsBlock,
    pub footer: Footer,
}

/// Invoice number, issue date and resolved order identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub invoice_number: String,
    pub issued: String,
    pub order_id: String,
}

impl Metadata {
    /// The three metadata lines as printed.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("{} {}", labels::INVOICE, self.invoice_number),
            format!("{} {}", labels::DATE, self.issued),
            format!("{} {}", labels::ORDER, self.order_id),
        ]
    }
}

/// Customer name with the optional email and address lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerBlock {
    pub name: String,
    /// `Email: ...`, only when the customer has one
    pub email_line: Option<String>,
    /// Street, `city, state`, postal code; only when an address is given
    pub address_lines: Option<[String; 3]>,
}

/// One product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    /// Tax name and rate, only for a tax with a rate above zero
    pub tax_note: Option<String>,
}

impl ItemBlock {
    /// `2 x $5.00`
    pub fn quantity_line(&self) -> String {
        format!("{} x {}", self.quantity, self.unit_price)
    }
}

/// Invoice totals, displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsBlock {
    pub subtotal: String,
    /// Only when the total tax is above zero
    pub tax: Option<String>,
    pub total: String,
}

/// Closing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub lines: [String; 2],
    pub issued: String,
}

impl ReceiptContent {
    /// Build the receipt content for an invoice.
    pub fn build(invoice: &InvoiceModel, company: &CompanyProfile) -> Self {
        let issued = format::datetime(&invoice.issued_at);

        let header = [
            &company.name,
            &company.tagline,
            &company.phone,
            &company.email,
            &company.address,
        ]
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect();

        let customer = &invoice.customer;
        let customer = CustomerBlock {
            name: customer.name.clone(),
            email_line: customer
                .email
                .as_ref()
                .map(|email| format!("{} {}", labels::EMAIL, email)),
            address_lines: customer.address.as_ref().map(|a| {
                [
                    a.address.clone(),
                    format!("{}, {}", a.city, a.state),
                    a.zip_code.clone(),
                ]
            }),
        };

        let items = invoice
            .products
            .iter()
            .map(|item| ItemBlock {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: format::money(item.unit_price),
                line_total: format::money(item.line_total),
                tax_note: item
                    .applied_tax()
                    .map(|tax| format!("{} ({}%)", tax.name, format::rate(tax.rate_percent))),
            })
            .collect();

        let totals = TotalsBlock {
            subtotal: format::money(invoice.subtotal),
            tax: (invoice.total_tax > 0.0).then(|| format::money(invoice.total_tax)),
            total: format::money(invoice.total),
        };

        Self {
            header,
            metadata: Metadata {
                invoice_number: invoice.invoice_number.clone(),
                issued: issued.clone(),
                order_id: invoice.order_id().to_string(),
            },
            customer,
            items,
            totals,
            footer: Footer {
                lines: [company.thank_you.clone(), company.brand_line.clone()],
                issued,
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Invoices shared by the encoder, renderer and orchestrator tests.

    use chrono::DateTime;

    use crate::invoice::*;

    /// Two products, the first taxed at 10%, the second untaxed; email, no
    /// address.
    pub fn two_products() -> InvoiceModel {
        InvoiceModel {
            invoice_id: "inv-1".into(),
            invoice_number: "F-0001".into(),
            issued_at: DateTime::parse_from_rfc3339("2024-03-05T14:30:00-03:00").unwrap(),
            status: InvoiceStatus::Paid,
            order: Reference::Record(RecordRef {
                primary: Some("O1".into()),
                secondary: None,
            }),
            customer: Customer {
                id: "c-1".into(),
                name: "Ana Perez".into(),
                email: Some("ana@example.com".into()),
                address: None,
            },
            products: vec![
                LineItem {
                    product_ref: Reference::Id("p-1".into()),
                    name: "Coffee beans".into(),
                    quantity: 2,
                    unit_price: 5.0,
                    tax: Some(Tax {
                        id: "t-1".into(),
                        name: "VAT".into(),
                        rate_percent: 10.0,
                    }),
                    tax_amount: Some(1.0),
                    line_total: 10.0,
                },
                LineItem {
                    product_ref: Reference::Id("p-2".into()),
                    name: "Paper filters".into(),
                    quantity: 1,
                    unit_price: 3.5,
                    tax: None,
                    tax_amount: None,
                    line_total: 3.5,
                },
            ],
            subtotal: 13.5,
            total_tax: 1.0,
            total: 14.5,
        }
    }

    /// Same invoice with an address, no email and no tax at all.
    pub fn untaxed_with_address() -> InvoiceModel {
        let mut invoice = two_products();
        invoice.customer.email = None;
        invoice.customer.address = Some(PostalAddress {
            address: "742 Evergreen Terrace".into(),
            city: "Springfield".into(),
            state: "OR".into(),
            zip_code: "97403".into(),
        });
        for item in &mut invoice.products {
            item.tax = None;
            item.tax_amount = None;
        }
        invoice.total_tax = 0.0;
        invoice.total = invoice.subtotal;
        invoice
    }
}
