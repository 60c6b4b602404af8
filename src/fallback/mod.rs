//! # Fallback Renderer
//!
//! When no printer is paired, the receipt is rendered as a page for the
//! host's own print dialog instead.
//!
//! ```text
//! InvoiceModel ──► ReceiptContent ──► Document ──► HTML ──► PrintSurface
//!                   (shared with        (layout)
//!                    the encoder)
//! ```
//!
//! The [`Document`] carries exactly the sections the ESC/POS receipt prints,
//! in the same order, with the same optional parts. The two [`Layout`]s only
//! change page size, type scale and how line items are arranged.
//!
//! ## Example
//!
//! ```
//! use boleta::config::CompanyProfile;
//! use boleta::fallback::{self, Layout, SectionKind};
//! use boleta::invoice::InvoiceModel;
//!
//! let invoice = InvoiceModel::from_json(r#"{
//!     "_id": "inv-1", "invoiceNumber": "F-0001",
//!     "issuedAt": "2024-03-05T14:30:00Z", "status": "paid",
//!     "order": {"_id": "O1"}, "customer": {"_id": "c-1", "name": "Ana"},
//!     "products": [], "subtotal": 0, "totalTax": 0, "total": 0
//! }"#)?;
//!
//! let doc = fallback::render(&invoice, &CompanyProfile::default(), Layout::Full);
//! assert_eq!(doc.sections[0].kind(), SectionKind::Header);
//! assert!(doc.to_html().contains("Order: O1"));
//! # Ok::<(), boleta::error::InvoiceError>(())
//! ```

pub mod html;
pub mod surface;

pub use surface::{print_document, PrintSurface, RecordingSurface, SurfaceHandle, SystemPrintSurface};

use std::fmt;
use std::str::FromStr;

use crate::config::CompanyProfile;
use crate::content::{CustomerBlock, Footer, ItemBlock, Metadata, ReceiptContent, TotalsBlock};
use crate::invoice::InvoiceModel;

/// Page arrangement of the fallback document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Receipt-width page, items stacked, small type
    #[default]
    Compact,
    /// A4 page, items in a Qty / Unit / Total grid, larger type
    Full,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown layout '{}' (expected compact or full)", other)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => f.write_str("compact"),
            Self::Full => f.write_str("full"),
        }
    }
}

/// Page sizing and typography for one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    /// CSS `@page` size
    pub size: &'static str,
    /// Content width in millimetres
    pub width_mm: u32,
    pub margin_mm: u32,
    /// Body text size in points
    pub font_pt: f32,
    /// Header and total size relative to body text
    pub heading_scale: f32,
}

impl PageSpec {
    pub const COMPACT: Self = Self {
        size: "80mm auto",
        width_mm: 72,
        margin_mm: 4,
        font_pt: 9.0,
        heading_scale: 1.4,
    };

    pub const FULL: Self = Self {
        size: "A4",
        width_mm: 180,
        margin_mm: 15,
        font_pt: 11.0,
        heading_scale: 1.8,
    };

    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::Compact => Self::COMPACT,
            Layout::Full => Self::FULL,
        }
    }
}

/// Which block of the receipt a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Metadata,
    Customer,
    Items,
    Totals,
    Footer,
}

/// One block of the receipt.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Header(Vec<String>),
    Metadata(Metadata),
    Customer(CustomerBlock),
    Items(Vec<ItemBlock>),
    Totals(TotalsBlock),
    Footer(Footer),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Header(_) => SectionKind::Header,
            Self::Metadata(_) => SectionKind::Metadata,
            Self::Customer(_) => SectionKind::Customer,
            Self::Items(_) => SectionKind::Items,
            Self::Totals(_) => SectionKind::Totals,
            Self::Footer(_) => SectionKind::Footer,
        }
    }
}

/// A laid-out fallback document, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub layout: Layout,
    pub page: PageSpec,
    /// Page title (`<company> - <invoice number>`)
    pub title: String,
    pub sections: Vec<Section>,
}

impl Document {
    /// Section kinds in document order.
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(Section::kind).collect()
    }
}

/// Render an invoice as a fallback document. Pure.
pub fn render(invoice: &InvoiceModel, company: &CompanyProfile, layout: Layout) -> Document {
    let content = ReceiptContent::build(invoice, company);
    from_content(content, layout)
}

/// Lay out already-built receipt content.
pub fn from_content(content: ReceiptContent, layout: Layout) -> Document {
    let title = match content.header.first() {
        Some(company) => format!("{} - {}", company, content.metadata.invoice_number),
        None => content.metadata.invoice_number.clone(),
    };

    Document {
        layout,
        page: PageSpec::for_layout(layout),
        title,
        sections: vec![
            Section::Header(content.header),
            Section::Metadata(content.metadata),
            Section::Customer(content.customer),
            Section::Items(content.items),
            Section::Totals(content.totals),
            Section::Footer(content.footer),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_order() {
        let doc = render(
            &fixtures::two_products(),
            &CompanyProfile::default(),
            Layout::Compact,
        );
        assert_eq!(
            doc.section_kinds(),
            vec![
                SectionKind::Header,
                SectionKind::Metadata,
                SectionKind::Customer,
                SectionKind::Items,
                SectionKind::Totals,
                SectionKind::Footer,
            ]
        );
    }

    #[test]
    fn test_layouts_share_sections() {
        let invoice = fixtures::two_products();
        let company = CompanyProfile::default();
        let compact = render(&invoice, &company, Layout::Compact);
        let full = render(&invoice, &company, Layout::Full);

        assert_eq!(compact.sections, full.sections);
        assert_ne!(compact.page, full.page);
    }

    #[test]
    fn test_title() {
        let doc = render(
            &fixtures::two_products(),
            &CompanyProfile::default(),
            Layout::Full,
        );
        assert_eq!(doc.title, "BOLETA STORE - F-0001");
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("FULL".parse::<Layout>(), Ok(Layout::Full));
        assert_eq!("compact".parse::<Layout>(), Ok(Layout::Compact));
        assert!("tabloid".parse::<Layout>().is_err());
        assert_eq!(Layout::default().to_string(), "compact");
    }
}
