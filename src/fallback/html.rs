//! HTML serialization of fallback documents.
//!
//! One stylesheet per page, sized from the document's [`PageSpec`]. The
//! compact layout stacks each item's lines like the paper receipt; the full
//! layout puts items in a table with Qty, Unit and Total columns.

use std::fmt::Write;

use super::{Document, Layout, PageSpec, Section};
use crate::content::{labels, CustomerBlock, Footer, ItemBlock, Metadata, TotalsBlock};

/// Script that opens the print dialog once the page has loaded.
pub const PRINT_TRIGGER: &str =
    "<script>window.addEventListener('load', function () { window.print(); });</script>";

/// Escape text for HTML element content and attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Insert [`PRINT_TRIGGER`] right before `</body>`.
pub fn with_print_trigger(html: &str) -> String {
    match html.rfind("</body>") {
        Some(at) => format!("{}{}{}", &html[..at], PRINT_TRIGGER, &html[at..]),
        None => format!("{}{}", html, PRINT_TRIGGER),
    }
}

impl Document {
    /// Serialize to a standalone HTML page.
    pub fn to_html(&self) -> String {
        let mut body = String::new();
        for section in &self.sections {
            match section {
                Section::Header(lines) => header(&mut body, lines),
                Section::Metadata(metadata) => metadata_block(&mut body, metadata),
                Section::Customer(customer) => customer_block(&mut body, customer),
                Section::Items(items) => match self.layout {
                    Layout::Compact => items_stacked(&mut body, items),
                    Layout::Full => items_grid(&mut body, items),
                },
                Section::Totals(totals) => totals_block(&mut body, totals),
                Section::Footer(footer) => footer_block(&mut body, footer),
            }
        }
        shell(&self.title, &self.page, self.layout, &body)
    }
}

fn shell(title: &str, page: &PageSpec, layout: Layout, body: &str) -> String {
    let heading_pt = page.font_pt * page.heading_scale;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<title>{title}</title>
<style>
@page {{ size: {size}; margin: {margin}mm; }}
body {{ font-family: ui-monospace, SFMono-Regular, Menlo, monospace; font-size: {font}pt; margin: 0 auto; width: {width}mm; color: #111; background: #fff; }}
section {{ margin: 0 0 1em 0; }}
.header, .footer {{ text-align: center; }}
.header p {{ font-weight: bold; font-size: {heading}pt; margin: 0; }}
.metadata p {{ font-weight: bold; margin: 0; }}
h3 {{ font-size: {font}pt; margin: 0 0 0.25em 0; }}
p {{ margin: 0; }}
.line {{ display: flex; justify-content: space-between; gap: 8px; }}
.item {{ margin-bottom: 0.5em; }}
.item .name {{ font-weight: bold; }}
.note {{ padding-left: 1em; color: #444; }}
table.items {{ width: 100%; border-collapse: collapse; }}
table.items th, table.items td {{ padding: 2px 4px; border-bottom: 1px solid #ccc; vertical-align: top; }}
table.items th {{ text-align: left; }}
table.items .num {{ text-align: right; white-space: nowrap; }}
.totals {{ border-top: 1px dashed #111; padding-top: 0.25em; }}
.grand {{ border-top: 1px dashed #111; margin-top: 0.25em; font-weight: bold; font-size: {heading}pt; }}
</style>
</head>
<body class="{layout}">
{body}</body>
</html>
"#,
        title = escape(title),
        size = page.size,
        margin = page.margin_mm,
        width = page.width_mm,
        font = page.font_pt,
        heading = heading_pt,
        layout = layout,
        body = body,
    )
}

fn header(out: &mut String, lines: &[String]) {
    out.push_str("<section class=\"header\">\n");
    for line in lines {
        let _ = writeln!(out, "<p>{}</p>", escape(line));
    }
    out.push_str("</section>\n");
}

fn metadata_block(out: &mut String, metadata: &Metadata) {
    out.push_str("<section class=\"metadata\">\n");
    for line in metadata.lines() {
        let _ = writeln!(out, "<p>{}</p>", escape(&line));
    }
    out.push_str("</section>\n");
}

fn customer_block(out: &mut String, customer: &CustomerBlock) {
    out.push_str("<section class=\"customer\">\n");
    let _ = writeln!(out, "<h3>{}</h3>", escape(labels::CLIENT));
    let _ = writeln!(out, "<p>{}</p>", escape(&customer.name));
    if let Some(email) = &customer.email_line {
        let _ = writeln!(out, "<p>{}</p>", escape(email));
    }
    if let Some(address) = &customer.address_lines {
        for line in address {
            let _ = writeln!(out, "<p>{}</p>", escape(line));
        }
    }
    out.push_str("</section>\n");
}

fn items_stacked(out: &mut String, items: &[ItemBlock]) {
    out.push_str("<section class=\"items\">\n");
    let _ = writeln!(out, "<h3>{}</h3>", escape(labels::ARTICLES));
    for item in items {
        out.push_str("<div class=\"item\">\n");
        let _ = writeln!(out, "<div class=\"name\">{}</div>", escape(&item.name));
        let _ = writeln!(
            out,
            "<div class=\"line\"><span>{}</span><span>{}</span></div>",
            escape(&item.quantity_line()),
            escape(&item.line_total)
        );
        if let Some(note) = &item.tax_note {
            let _ = writeln!(out, "<div class=\"note\">{}</div>", escape(note));
        }
        out.push_str("</div>\n");
    }
    out.push_str("</section>\n");
}

fn items_grid(out: &mut String, items: &[ItemBlock]) {
    out.push_str("<section class=\"items\">\n");
    let _ = writeln!(out, "<h3>{}</h3>", escape(labels::ARTICLES));
    out.push_str("<table class=\"items\">\n");
    out.push_str(
        "<thead><tr><th>Item</th><th class=\"num\">Qty</th><th class=\"num\">Unit</th><th class=\"num\">Total</th></tr></thead>\n<tbody>\n",
    );
    for item in items {
        let _ = write!(out, "<tr><td><span class=\"name\">{}</span>", escape(&item.name));
        if let Some(note) = &item.tax_note {
            let _ = write!(out, "<div class=\"note\">{}</div>", escape(note));
        }
        let _ = writeln!(
            out,
            "</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            item.quantity,
            escape(&item.unit_price),
            escape(&item.line_total)
        );
    }
    out.push_str("</tbody>\n</table>\n</section>\n");
}

fn totals_block(out: &mut String, totals: &TotalsBlock) {
    out.push_str("<section class=\"totals\">\n");
    let _ = writeln!(
        out,
        "<div class=\"line\"><span>{}</span><span>{}</span></div>",
        labels::SUBTOTAL,
        escape(&totals.subtotal)
    );
    if let Some(tax) = &totals.tax {
        let _ = writeln!(
            out,
            "<div class=\"line\"><span>{}</span><span>{}</span></div>",
            labels::TAX,
            escape(tax)
        );
    }
    let _ = writeln!(
        out,
        "<div class=\"line grand\"><span>{}</span><span>{}</span></div>",
        labels::TOTAL,
        escape(&totals.total)
    );
    out.push_str("</section>\n");
}

fn footer_block(out: &mut String, footer: &Footer) {
    out.push_str("<section class=\"footer\">\n");
    for line in &footer.lines {
        let _ = writeln!(out, "<p>{}</p>", escape(line));
    }
    let _ = writeln!(out, "<p>{}</p>", escape(&footer.issued));
    out.push_str("</section>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompanyProfile;
    use crate::content::fixtures;
    use crate::fallback::render;

    fn html(invoice: &crate::invoice::InvoiceModel, layout: Layout) -> String {
        render(invoice, &CompanyProfile::default(), layout).to_html()
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_compact_is_stacked() {
        let page = html(&fixtures::two_products(), Layout::Compact);
        assert!(page.contains("size: 80mm auto"));
        assert!(page.contains("<div class=\"item\">"));
        assert!(page.contains("<span>2 x $5.00</span><span>$10.00</span>"));
        assert!(!page.contains("<table"));
    }

    #[test]
    fn test_full_is_tabular() {
        let page = html(&fixtures::two_products(), Layout::Full);
        assert!(page.contains("size: A4"));
        assert!(page.contains("<th class=\"num\">Qty</th>"));
        assert!(page.contains(
            "<td class=\"num\">2</td><td class=\"num\">$5.00</td><td class=\"num\">$10.00</td>"
        ));
    }

    #[test]
    fn test_optional_sections_follow_content() {
        for layout in [Layout::Compact, Layout::Full] {
            let taxed = html(&fixtures::two_products(), layout);
            assert!(taxed.contains("VAT (10%)"));
            assert!(taxed.contains("<span>Tax:</span><span>$1.00</span>"));
            assert!(taxed.contains("Email: ana@example.com"));

            let plain = html(&fixtures::untaxed_with_address(), layout);
            assert!(!plain.contains("%)"));
            assert!(!plain.contains("<span>Tax:</span>"));
            assert!(!plain.contains("Email:"));
            assert!(plain.contains("<p>Springfield, OR</p>"));
        }
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut invoice = fixtures::two_products();
        invoice.customer.name = "<script>alert(1)</script>".into();
        let page = html(&invoice, Layout::Compact);
        assert!(!page.contains("<script>alert(1)"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_print_trigger_before_body_end() {
        let page = with_print_trigger(&html(&fixtures::two_products(), Layout::Compact));
        let trigger = page.find("window.print()").unwrap();
        let end = page.find("</body>").unwrap();
        assert!(trigger < end);
    }

    #[test]
    fn test_no_trigger_in_plain_html() {
        let page = html(&fixtures::two_products(), Layout::Full);
        assert!(!page.contains("window.print"));
    }
}
