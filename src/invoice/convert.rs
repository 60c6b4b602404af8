//! Validation from JSON wire types to [`InvoiceModel`].
//!
//! Everything the receipt depends on is checked here, so the encoder and the
//! renderer can treat their input as well-formed.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::InvoiceError;

use super::model::*;
use super::schema::*;

impl InvoiceModel {
    /// Parse and validate an invoice from JSON.
    pub fn from_json(raw: &str) -> Result<Self, InvoiceError> {
        let json: JsonInvoice = serde_json::from_str(raw)?;
        Self::try_from(json)
    }
}

impl TryFrom<JsonInvoice> for InvoiceModel {
    type Error = InvoiceError;

    fn try_from(json: JsonInvoice) -> Result<Self, Self::Error> {
        const CTX: &str = "invoice";

        let issued_raw = required(json.issued_at, CTX, "issuedAt")?;
        let status_raw = required(json.status, CTX, "status")?;
        let status = status_raw
            .parse::<InvoiceStatus>()
            .map_err(|message| InvoiceError::InvalidField {
                context: CTX,
                field: "status",
                message,
            })?;

        let order = json
            .order
            .map(Reference::from)
            .ok_or(InvoiceError::MissingField {
                context: CTX,
                field: "order",
            })?;

        let customer = json.customer.ok_or(InvoiceError::MissingField {
            context: CTX,
            field: "customer",
        })?;

        let products = json
            .products
            .into_iter()
            .map(LineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            invoice_id: required(json.invoice_id, CTX, "_id")?,
            invoice_number: required(json.invoice_number, CTX, "invoiceNumber")?,
            issued_at: parse_timestamp(&issued_raw)?,
            status,
            order,
            customer: Customer::try_from(customer)?,
            products,
            subtotal: amount(json.subtotal, CTX, "subtotal")?,
            total_tax: amount(json.total_tax, CTX, "totalTax")?,
            total: amount(json.total, CTX, "total")?,
        })
    }
}

impl From<JsonRef> for Reference {
    fn from(json: JsonRef) -> Self {
        match json {
            JsonRef::Id(id) => Reference::Id(id),
            JsonRef::Record(record) => Reference::Record(record.into()),
        }
    }
}

impl TryFrom<JsonCustomer> for Customer {
    type Error = InvoiceError;

    fn try_from(json: JsonCustomer) -> Result<Self, Self::Error> {
        const CTX: &str = "customer";

        Ok(Self {
            id: required(json.id, CTX, "_id")?,
            name: required(json.name, CTX, "name")?,
            email: non_blank(json.email),
            address: json.address.and_then(PostalAddress::from_json),
        })
    }
}

impl PostalAddress {
    /// An address object with every field blank is the same as no address.
    fn from_json(json: JsonAddress) -> Option<Self> {
        let address = Self {
            address: json.address.unwrap_or_default().trim().to_string(),
            city: json.city.unwrap_or_default().trim().to_string(),
            state: json.state.unwrap_or_default().trim().to_string(),
            zip_code: json.zip_code.unwrap_or_default().trim().to_string(),
        };
        let blank = address.address.is_empty()
            && address.city.is_empty()
            && address.state.is_empty()
            && address.zip_code.is_empty();
        (!blank).then_some(address)
    }
}

impl TryFrom<JsonLineItem> for LineItem {
    type Error = InvoiceError;

    fn try_from(json: JsonLineItem) -> Result<Self, Self::Error> {
        const CTX: &str = "product";

        // A populated product record may carry the name instead of the line
        let record_name = match &json.product {
            Some(JsonRef::Record(record)) => record.name.clone(),
            _ => None,
        };
        let name = required(non_blank(json.name).or(record_name), CTX, "name")?;

        let product_ref = json.product.map(Reference::from).ok_or(InvoiceError::MissingField {
            context: CTX,
            field: "product",
        })?;

        let quantity = json.quantity.ok_or(InvoiceError::MissingField {
            context: CTX,
            field: "quantity",
        })?;
        if !(quantity >= 1.0 && quantity.fract() == 0.0 && quantity <= u32::MAX as f64) {
            return Err(InvoiceError::InvalidField {
                context: CTX,
                field: "quantity",
                message: format!("expected a whole number above zero, got {}", quantity),
            });
        }

        let tax = json.tax.map(Tax::try_from).transpose()?;

        Ok(Self {
            product_ref,
            name,
            quantity: quantity as u32,
            unit_price: amount(json.unit_price, CTX, "unitPrice")?,
            tax,
            tax_amount: json
                .tax_amount
                .map(|v| amount(Some(v), CTX, "taxAmount"))
                .transpose()?,
            line_total: amount(json.line_total, CTX, "lineTotal")?,
        })
    }
}

impl TryFrom<JsonTax> for Tax {
    type Error = InvoiceError;

    fn try_from(json: JsonTax) -> Result<Self, Self::Error> {
        const CTX: &str = "tax";

        Ok(Self {
            id: non_blank(json.id).unwrap_or_default(),
            name: required(json.name, CTX, "name")?,
            rate_percent: amount(json.rate_percent, CTX, "ratePercent")?,
        })
    }
}

// ============================================================================
// FIELD HELPERS
// ============================================================================

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    value: Option<String>,
    context: &'static str,
    field: &'static str,
) -> Result<String, InvoiceError> {
    non_blank(value).ok_or(InvoiceError::MissingField { context, field })
}

fn amount(
    value: Option<f64>,
    context: &'static str,
    field: &'static str,
) -> Result<f64, InvoiceError> {
    let value = value.ok_or(InvoiceError::MissingField { context, field })?;
    if !value.is_finite() || value < 0.0 {
        return Err(InvoiceError::InvalidField {
            context,
            field,
            message: format!("expected a non-negative amount, got {}", value),
        });
    }
    Ok(value)
}

/// RFC 3339 timestamps keep their offset; naive ones are taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, InvoiceError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map(|naive| naive.and_utc().fixed_offset())
        })
        .map_err(|e| InvoiceError::InvalidField {
            context: "invoice",
            field: "issuedAt",
            message: format!("'{}' is not a timestamp: {}", raw, e),
        })
}
