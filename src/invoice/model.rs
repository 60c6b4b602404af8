//! The validated invoice snapshot consumed by both output paths.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

/// Shown wherever an identifier cannot be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Cancelled,
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "issued" | "pending" => Ok(Self::Issued),
            "paid" => Ok(Self::Paid),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Identifier fields of a referenced record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordRef {
    /// `_id`
    pub primary: Option<String>,
    /// `id`
    pub secondary: Option<String>,
}

/// An order or product reference, given either as a bare identifier or as a
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Id(String),
    Record(RecordRef),
}

/// How an invoice names its order.
pub type OrderRef = Reference;

impl Reference {
    /// The identifier to display for this reference.
    pub fn display_id(&self) -> &str {
        resolve_order_id(self)
    }
}

/// Resolve a reference to one display identifier.
///
/// Priority: the bare string, then the record's `_id`, then its `id`, then
/// [`NOT_AVAILABLE`]. Blank strings count as absent.
///
/// ```
/// use boleta::invoice::{resolve_order_id, Reference, RecordRef};
///
/// let bare = Reference::Id("O1".into());
/// let record = Reference::Record(RecordRef { primary: None, secondary: Some("7".into()) });
/// assert_eq!(resolve_order_id(&bare), "O1");
/// assert_eq!(resolve_order_id(&record), "7");
/// ```
pub fn resolve_order_id(order: &Reference) -> &str {
    fn present(s: &Option<String>) -> Option<&str> {
        s.as_deref().filter(|v| !v.trim().is_empty())
    }

    match order {
        Reference::Id(id) if !id.trim().is_empty() => id.as_str(),
        Reference::Id(_) => NOT_AVAILABLE,
        Reference::Record(record) => present(&record.primary)
            .or_else(|| present(&record.secondary))
            .unwrap_or(NOT_AVAILABLE),
    }
}

/// Structured postal address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// The customer an invoice is billed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<PostalAddress>,
}

/// A tax applied to a line item.
#[derive(Debug, Clone, PartialEq)]
pub struct Tax {
    pub id: String,
    pub name: String,
    pub rate_percent: f64,
}

/// One product line. Amounts are display values, never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_ref: Reference,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub tax: Option<Tax>,
    pub tax_amount: Option<f64>,
    pub line_total: f64,
}

impl LineItem {
    /// The tax to annotate on the receipt: present with a positive rate.
    pub fn applied_tax(&self) -> Option<&Tax> {
        self.tax.as_ref().filter(|tax| tax.rate_percent > 0.0)
    }
}

/// Validated, immutable invoice snapshot.
///
/// `total == subtotal + total_tax` is expected to hold but is never checked
/// or recomputed here; all three are printed as given.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceModel {
    pub invoice_id: String,
    pub invoice_number: String,
    pub issued_at: DateTime<FixedOffset>,
    pub status: InvoiceStatus,
    pub order: OrderRef,
    pub customer: Customer,
    pub products: Vec<LineItem>,
    pub subtotal: f64,
    pub total_tax: f64,
    pub total: f64,
}

impl InvoiceModel {
    /// The resolved order identifier.
    pub fn order_id(&self) -> &str {
        resolve_order_id(&self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(primary: Option<&str>, secondary: Option<&str>) -> Reference {
        Reference::Record(RecordRef {
            primary: primary.map(String::from),
            secondary: secondary.map(String::from),
        })
    }

    #[test]
    fn test_resolve_bare_string() {
        assert_eq!(resolve_order_id(&Reference::Id("ORD-9".into())), "ORD-9");
    }

    #[test]
    fn test_resolve_primary_wins() {
        assert_eq!(resolve_order_id(&record(Some("O1"), Some("2"))), "O1");
    }

    #[test]
    fn test_resolve_secondary_only() {
        assert_eq!(resolve_order_id(&record(None, Some("2"))), "2");
    }

    #[test]
    fn test_resolve_neither() {
        assert_eq!(resolve_order_id(&record(None, None)), NOT_AVAILABLE);
    }

    #[test]
    fn test_resolve_blank_counts_as_absent() {
        assert_eq!(resolve_order_id(&Reference::Id("  ".into())), NOT_AVAILABLE);
        assert_eq!(resolve_order_id(&record(Some(""), Some("2"))), "2");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("PAID".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Paid));
        assert_eq!("canceled".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Cancelled));
        assert!("lost".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn test_zero_rate_tax_is_not_applied() {
        let item = LineItem {
            product_ref: Reference::Id("P1".into()),
            name: "Bread".into(),
            quantity: 1,
            unit_price: 1.0,
            tax: Some(Tax {
                id: "T0".into(),
                name: "Exempt".into(),
                rate_percent: 0.0,
            }),
            tax_amount: None,
            line_total: 1.0,
        };
        assert!(item.applied_tax().is_none());
    }
}
