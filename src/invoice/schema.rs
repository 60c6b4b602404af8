//! JSON wire types for invoices as delivered by the data-access layer.
//!
//! Everything is optional here; [`super::convert`] decides what is required.

use serde::Deserialize;

use super::model::RecordRef;

/// Top-level invoice object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonInvoice {
    #[serde(rename = "_id", alias = "invoiceId")]
    pub invoice_id: Option<String>,
    pub invoice_number: Option<String>,
    #[serde(alias = "createdAt", alias = "date")]
    pub issued_at: Option<String>,
    pub status: Option<String>,
    pub order: Option<JsonRef>,
    pub customer: Option<JsonCustomer>,
    #[serde(default)]
    pub products: Vec<JsonLineItem>,
    pub subtotal: Option<f64>,
    #[serde(alias = "tax")]
    pub total_tax: Option<f64>,
    pub total: Option<f64>,
}

/// A reference that is either a bare id or a (possibly populated) record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonRef {
    Id(String),
    Record(JsonRecord),
}

/// The fields of a referenced record the receipt cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRecord {
    #[serde(rename = "_id")]
    pub primary: Option<String>,
    #[serde(rename = "id")]
    pub secondary: Option<String>,
    pub name: Option<String>,
}

impl From<JsonRecord> for RecordRef {
    fn from(record: JsonRecord) -> Self {
        Self {
            primary: record.primary,
            secondary: record.secondary,
        }
    }
}

/// Customer object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCustomer {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<JsonAddress>,
}

/// Postal address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAddress {
    #[serde(alias = "street")]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(alias = "postalCode")]
    pub zip_code: Option<String>,
}

/// One product line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLineItem {
    pub product: Option<JsonRef>,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    #[serde(alias = "price")]
    pub unit_price: Option<f64>,
    pub tax: Option<JsonTax>,
    pub tax_amount: Option<f64>,
    #[serde(alias = "total")]
    pub line_total: Option<f64>,
}

/// Tax applied to a product line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTax {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "rate", alias = "percentage")]
    pub rate_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_bare_string() {
        let r: JsonRef = serde_json::from_str(r#""O1""#).unwrap();
        assert!(matches!(r, JsonRef::Id(id) if id == "O1"));
    }

    #[test]
    fn test_ref_record_ignores_extra_fields() {
        let r: JsonRef =
            serde_json::from_str(r#"{"_id": "O1", "status": "shipped", "items": []}"#).unwrap();
        match r {
            JsonRef::Record(rec) => assert_eq!(rec.primary.as_deref(), Some("O1")),
            JsonRef::Id(_) => panic!("expected record"),
        }
    }

    #[test]
    fn test_aliases() {
        let item: JsonLineItem =
            serde_json::from_str(r#"{"name": "Tea", "quantity": 1, "price": 2.5, "total": 2.5}"#)
                .unwrap();
        assert_eq!(item.unit_price, Some(2.5));
        assert_eq!(item.line_total, Some(2.5));

        let tax: JsonTax = serde_json::from_str(r#"{"name": "VAT", "rate": 10}"#).unwrap();
        assert_eq!(tax.rate_percent, Some(10.0));
    }
}
