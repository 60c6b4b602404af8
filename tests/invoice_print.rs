//! End-to-end tests: invoice JSON in, printer bytes or print-dialog page out.
//!
//! Both outputs are checked against each other: every optional part of the
//! receipt must appear on paper exactly when it appears on the page.

use boleta::config::{CompanyProfile, PrintPolicy};
use boleta::encoder;
use boleta::error::{ConnectionError, PrintError, TransmissionError};
use boleta::fallback::{self, Layout, RecordingSurface};
use boleta::invoice::{resolve_order_id, InvoiceModel, RecordRef, Reference, NOT_AVAILABLE};
use boleta::orchestrator::{PrintOrchestrator, PrintOutcome, PrinterState};
use boleta::printer::PrinterConfig;
use boleta::transport::{DeviceTransport, LoopbackHost};
use pretty_assertions::assert_eq;

const TWO_PRODUCTS: &str = r#"{
    "_id": "65f0c0ffee",
    "invoiceNumber": "F-0042",
    "issuedAt": "2024-03-05T14:30:00-03:00",
    "status": "paid",
    "order": { "_id": "O1", "id": "ignored" },
    "customer": {
        "_id": "c-7",
        "name": "Ana Perez",
        "email": "ana@example.com"
    },
    "products": [
        {
            "product": { "_id": "p-1", "name": "Coffee beans" },
            "name": "Coffee beans",
            "quantity": 2,
            "unitPrice": 5,
            "tax": { "_id": "t-1", "name": "VAT", "ratePercent": 10 },
            "taxAmount": 1,
            "lineTotal": 10
        },
        {
            "product": "p-2",
            "name": "Paper filters",
            "quantity": 1,
            "unitPrice": 3.5,
            "lineTotal": 3.5
        }
    ],
    "subtotal": 13.5,
    "totalTax": 1,
    "total": 14.5
}"#;

fn invoice() -> InvoiceModel {
    InvoiceModel::from_json(TWO_PRODUCTS).unwrap()
}

fn patched(patch: impl FnOnce(&mut serde_json::Value)) -> InvoiceModel {
    let mut value: serde_json::Value = serde_json::from_str(TWO_PRODUCTS).unwrap();
    patch(&mut value);
    InvoiceModel::from_json(&value.to_string()).unwrap()
}

fn receipt_text(invoice: &InvoiceModel) -> String {
    encoder::encode(invoice, &CompanyProfile::default())
        .text_lines()
        .join("\n")
}

fn page(invoice: &InvoiceModel, layout: Layout) -> String {
    fallback::render(invoice, &CompanyProfile::default(), layout).to_html()
}

/// Whether `needle` appears on paper, and in each layout.
fn presence(invoice: &InvoiceModel, needle: &str) -> [bool; 3] {
    [
        receipt_text(invoice).contains(needle),
        page(invoice, Layout::Compact).contains(needle),
        page(invoice, Layout::Full).contains(needle),
    ]
}

fn order_of(haystack: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|n| {
            haystack
                .find(n)
                .unwrap_or_else(|| panic!("'{}' missing", n))
        })
        .collect()
}

fn orchestrator(
    host: &LoopbackHost,
    surface: &RecordingSurface,
    fallback_on_transmission_error: bool,
) -> PrintOrchestrator {
    PrintOrchestrator::new(
        DeviceTransport::new(host.clone(), PrinterConfig::default()),
        surface.clone(),
        CompanyProfile::default(),
        PrintPolicy {
            fallback_on_transmission_error,
            surface_teardown_ms: 0,
        },
    )
}

// ============================================================================
// PARITY
// ============================================================================

#[test]
fn test_optional_sections_match_across_outputs() {
    let full = invoice();
    let bare = patched(|v| {
        v["customer"].as_object_mut().unwrap().remove("email");
        v["products"][0].as_object_mut().unwrap().remove("tax");
        v["totalTax"] = 0.into();
        v["total"] = 13.5.into();
    });
    let with_address = patched(|v| {
        v["customer"]["address"] = serde_json::json!({
            "address": "742 Evergreen Terrace",
            "city": "Springfield",
            "state": "OR",
            "zipCode": "97403"
        });
    });

    for needle in ["Email: ana@example.com", "VAT (10%)", "Tax:"] {
        assert_eq!(presence(&full, needle), [true; 3], "{}", needle);
        assert_eq!(presence(&bare, needle), [false; 3], "{}", needle);
    }
    for needle in ["742 Evergreen Terrace", "Springfield, OR", "97403"] {
        assert_eq!(presence(&with_address, needle), [true; 3], "{}", needle);
        assert_eq!(presence(&full, needle), [false; 3], "{}", needle);
    }
}

#[test]
fn test_zero_rate_tax_is_omitted_everywhere() {
    let invoice = patched(|v| v["products"][0]["tax"]["ratePercent"] = 0.into());
    assert_eq!(presence(&invoice, "VAT"), [false; 3]);
}

#[test]
fn test_section_order_matches_across_outputs() {
    let needles = [
        "Invoice: F-0042",
        "Order: O1",
        "CLIENT:",
        "Ana Perez",
        "ARTICLES:",
        "Coffee beans",
        "Paper filters",
        "Subtotal:",
        "TOTAL:",
        "Thank you for your purchase!",
    ];
    let invoice = invoice();

    for output in [
        receipt_text(&invoice),
        page(&invoice, Layout::Compact),
        page(&invoice, Layout::Full),
    ] {
        let positions = order_of(&output, &needles);
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    }
}

#[test]
fn test_items_keep_input_order() {
    let invoice = patched(|v| {
        let products = v["products"].as_array_mut().unwrap();
        products.reverse();
    });
    for output in [receipt_text(&invoice), page(&invoice, Layout::Full)] {
        let positions = order_of(&output, &["Paper filters", "Coffee beans"]);
        assert!(positions[0] < positions[1]);
    }
}

#[test]
fn test_totals_printed_verbatim() {
    // total != subtotal + tax on purpose
    let invoice = patched(|v| v["total"] = 20.into());
    assert_eq!(presence(&invoice, "$20.00"), [true; 3]);
    assert_eq!(presence(&invoice, "$14.50"), [false; 3]);
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_two_product_receipt() {
    let lines = encoder::encode(&invoice(), &CompanyProfile::default()).text_lines();

    let coffee = lines.iter().position(|l| l == "Coffee beans").unwrap();
    assert!(lines[coffee + 1].starts_with("2 x $5.00"));
    assert!(lines[coffee + 1].ends_with("$10.00"));
    assert_eq!(lines[coffee + 2], "  VAT (10%)");

    let filters = lines.iter().position(|l| l == "Paper filters").unwrap();
    assert!(lines[filters + 1].starts_with("1 x $3.50"));
    assert!(lines[filters + 1].ends_with("$3.50"));
    assert_eq!(lines[filters + 2], "");

    let subtotal = lines.iter().find(|l| l.starts_with("Subtotal:")).unwrap();
    let tax = lines.iter().find(|l| l.starts_with("Tax:")).unwrap();
    let total = lines.iter().find(|l| l.starts_with("TOTAL:")).unwrap();
    assert!(subtotal.ends_with("$13.50"));
    assert!(tax.ends_with("$1.00"));
    assert!(total.ends_with("$14.50"));
}

#[test]
fn test_order_record_with_primary_id() {
    let invoice = patched(|v| v["order"] = serde_json::json!({ "_id": "O1" }));
    assert_eq!(invoice.order_id(), "O1");
    assert_eq!(presence(&invoice, "Order: O1"), [true; 3]);
}

#[test]
fn test_order_resolution_cases() {
    let record = |primary: Option<&str>, secondary: Option<&str>| {
        Reference::Record(RecordRef {
            primary: primary.map(String::from),
            secondary: secondary.map(String::from),
        })
    };

    assert_eq!(resolve_order_id(&Reference::Id("ORD-1".into())), "ORD-1");
    assert_eq!(resolve_order_id(&record(Some("O1"), Some("2"))), "O1");
    assert_eq!(resolve_order_id(&record(None, Some("2"))), "2");
    assert_eq!(resolve_order_id(&record(None, None)), NOT_AVAILABLE);

    let cases = [
        (serde_json::json!("ORD-1"), "Order: ORD-1"),
        (serde_json::json!({ "_id": "O1", "id": "2" }), "Order: O1"),
        (serde_json::json!({ "id": "2" }), "Order: 2"),
        (serde_json::json!({}), "Order: N/A"),
    ];
    for (order, expected) in cases {
        let invoice = patched(|v| v["order"] = order);
        assert_eq!(presence(&invoice, expected), [true; 3], "{}", expected);
    }
}

#[test]
fn test_bytes_frame() {
    let bytes = encoder::encode_bytes(
        &invoice(),
        &CompanyProfile::default(),
        &PrinterConfig::default(),
    );
    // ESC @, ESC t 0
    assert_eq!(&bytes[..5], &[0x1B, 0x40, 0x1B, 0x74, 0x00]);
    // GS V 66 n
    assert_eq!(&bytes[bytes.len() - 4..], &[0x1D, 0x56, 0x42, 0x03]);
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

#[tokio::test]
async fn test_cancelled_pairing_prints_through_dialog() {
    let host = LoopbackHost::new().cancelling();
    let surface = RecordingSurface::new();
    let mut orchestrator = orchestrator(&host, &surface, false);

    let err = orchestrator.connect().await.unwrap_err();
    assert!(matches!(err, ConnectionError::UserCancelled));
    assert_eq!(orchestrator.state(), PrinterState::NoDevice);

    let outcome = orchestrator.print(&invoice()).await.unwrap();
    assert!(matches!(outcome, PrintOutcome::Fallback));

    let pages = surface.pages();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].contains("size: 80mm auto"));
    assert!(pages[0].contains("Order: O1"));
    assert_eq!(surface.live(), 0);
    assert!(host.written().is_empty());
}

#[tokio::test]
async fn test_unsupported_platform_prints_through_dialog() {
    let host = LoopbackHost::new().unsupported();
    let surface = RecordingSurface::new();
    let mut orchestrator = orchestrator(&host, &surface, false);

    assert!(matches!(
        orchestrator.connect().await,
        Err(ConnectionError::UnsupportedPlatform)
    ));
    let outcome = orchestrator.print(&invoice()).await.unwrap();
    assert!(matches!(outcome, PrintOutcome::Fallback));
}

#[tokio::test]
async fn test_paired_print_writes_command_stream() {
    let host = LoopbackHost::new();
    let surface = RecordingSurface::new();
    let mut orchestrator = orchestrator(&host, &surface, false);
    orchestrator.connect().await.unwrap();

    let invoice = invoice();
    orchestrator.print(&invoice).await.unwrap();

    assert_eq!(
        host.written(),
        encoder::encode_bytes(&invoice, &CompanyProfile::default(), &PrinterConfig::default())
    );
    assert_eq!(host.write_count(), 1);
    assert_eq!(surface.acquired(), 0);
}

#[tokio::test]
async fn test_transmission_error_disconnects_without_fallback() {
    let host = LoopbackHost::new();
    let surface = RecordingSurface::new();
    let mut orchestrator = orchestrator(&host, &surface, false);
    orchestrator.connect().await.unwrap();

    host.set_fail_writes(true);
    let err = orchestrator.print(&invoice()).await.unwrap_err();

    assert!(matches!(
        err,
        PrintError::Transmission(TransmissionError::Write(_))
    ));
    assert_eq!(orchestrator.state(), PrinterState::NoDevice);
    assert!(!orchestrator.transport().is_connected());
    assert_eq!(surface.acquired(), 0);
}

#[tokio::test]
async fn test_transmission_error_with_fallback_policy() {
    let host = LoopbackHost::new();
    let surface = RecordingSurface::new();
    let mut orchestrator = orchestrator(&host, &surface, true);
    orchestrator.connect().await.unwrap();

    host.set_fail_writes(true);
    let outcome = orchestrator.print(&invoice()).await.unwrap();

    assert!(matches!(outcome, PrintOutcome::FallbackAfterFailure(_)));
    assert_eq!(surface.triggered(), 1);
}

#[tokio::test]
async fn test_repeated_disconnect() {
    let host = LoopbackHost::new();
    let surface = RecordingSurface::new();
    let mut orchestrator = orchestrator(&host, &surface, false);

    orchestrator.connect().await.unwrap();
    for _ in 0..3 {
        orchestrator.disconnect().await;
        assert_eq!(orchestrator.state(), PrinterState::NoDevice);
    }
    assert_eq!(host.close_count(), 1);
}
