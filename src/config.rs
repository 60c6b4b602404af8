//! # Settings
//!
//! Static configuration for the print pipeline: the company identity printed
//! in the receipt header and footer, the printer hardware, and the
//! orchestrator's print policy.
//!
//! Every field has a default, so a settings file only needs the keys it
//! overrides:
//!
//! ```json
//! {
//!   "company": { "name": "Kiosko Norte", "phone": "+56 2 2345 6789" },
//!   "printer": { "baud_rate": 19200 },
//!   "policy": { "fallback_on_transmission_error": true }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BoletaError;
use crate::printer::PrinterConfig;

/// Company identity shown on every receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub tagline: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// First footer line
    pub thank_you: String,
    /// Second footer line
    pub brand_line: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "BOLETA STORE".to_string(),
            tagline: "Quality goods, fair prices".to_string(),
            phone: "Tel: +1 555 0100".to_string(),
            email: "sales@boleta.example".to_string(),
            address: "100 Market Street, Springfield".to_string(),
            thank_you: "Thank you for your purchase!".to_string(),
            brand_line: "See you again soon".to_string(),
        }
    }
}

/// Orchestrator behavior that is a deployment decision, not a fixed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintPolicy {
    /// After a failed device write, also open the print dialog with the
    /// compact document. Off by default: part of the receipt may already be
    /// on paper.
    pub fallback_on_transmission_error: bool,

    /// How long the temporary print surface lives after the dialog was
    /// triggered, in milliseconds.
    pub surface_teardown_ms: u64,
}

impl Default for PrintPolicy {
    fn default() -> Self {
        Self {
            fallback_on_transmission_error: false,
            surface_teardown_ms: 3000,
        }
    }
}

/// All settings, as loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub company: CompanyProfile,
    pub printer: PrinterConfig,
    pub policy: PrintPolicy,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BoletaError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            BoletaError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
            .map_err(|e| BoletaError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse settings from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_json(
            r#"{"company": {"name": "Kiosko Norte"}, "policy": {"fallback_on_transmission_error": true}}"#,
        )
        .unwrap();

        assert_eq!(settings.company.name, "Kiosko Norte");
        assert_eq!(settings.company.tagline, CompanyProfile::default().tagline);
        assert!(settings.policy.fallback_on_transmission_error);
        assert_eq!(settings.policy.surface_teardown_ms, 3000);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/nonexistent/boleta.json").unwrap_err();
        assert!(matches!(err, BoletaError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"printer": {"columns": 32}}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.printer.columns, 32);
    }
}
