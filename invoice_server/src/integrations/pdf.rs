//! Deterministic invoice PDF synthesis.
//!
//! A single-page PDF is assembled object-by-object (catalog, page tree, page, Helvetica font,
//! content stream, xref table). The layout is plain text lines; nothing here depends on wall-clock
//! time or randomness, so the same billing facts always produce byte-identical output. Text is
//! folded to ASCII before it enters the content stream, which keeps the `/Length` byte count and
//! the standard font encoding honest.

use ifg_common::Paise;
use invoice_engine::{
    journal_types::BillingFacts,
    traits::{InvoiceRenderer, RenderError},
};

use crate::config::StoreConfig;

const PAGE_TOP_Y: u32 = 792;
const LEFT_MARGIN_X: u32 = 50;
const FONT_SIZE: u32 = 11;
const LINE_HEIGHT: u32 = 14;

#[derive(Clone)]
pub struct PdfRenderer {
    store: StoreConfig,
}

impl PdfRenderer {
    pub fn new(store: StoreConfig) -> Self {
        Self { store }
    }
}

impl InvoiceRenderer for PdfRenderer {
    async fn render(&self, facts: &BillingFacts) -> Result<Vec<u8>, RenderError> {
        Ok(build_pdf(&self.store, facts))
    }
}

fn build_pdf(store: &StoreConfig, facts: &BillingFacts) -> Vec<u8> {
    let lines = layout_lines(store, facts);
    let content = content_stream(&lines);
    let objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
    ];
    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{object}\nendobj\n", i + 1));
    }
    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.into_bytes()
}

fn content_stream(lines: &[String]) -> String {
    let mut ops = format!("BT\n/F1 {FONT_SIZE} Tf\n{LINE_HEIGHT} TL\n{LEFT_MARGIN_X} {PAGE_TOP_Y} Td\n");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push_str("T*\n");
        }
        ops.push_str(&format!("({}) Tj\n", escape_pdf_text(line)));
    }
    ops.push_str("ET");
    ops
}

fn escape_pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\\' => "\\\\".to_string(),
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            c if c.is_ascii_graphic() || c == ' ' => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

fn layout_lines(store: &StoreConfig, facts: &BillingFacts) -> Vec<String> {
    let mut lines = vec![store.name.clone()];
    if !store.address.is_empty() {
        lines.push(store.address.clone());
    }
    if !store.email.is_empty() || !store.phone.is_empty() {
        lines.push(format!("{} {}", store.email, store.phone).trim().to_string());
    }
    lines.push(String::new());
    lines.push("TAX INVOICE".to_string());
    lines.push(String::new());
    lines.push(format!("Order: {}", facts.order_id));
    lines.push(format!("Currency: {}", facts.currency));
    lines.push(String::new());

    let customer = &facts.customer;
    lines.push("Billed to:".to_string());
    for field in [&customer.name, &customer.email, &customer.phone, &customer.address_line1, &customer.address_line2] {
        if let Some(value) = field.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("  {value}"));
        }
    }
    let locality = [customer.city.as_deref(), customer.state.as_deref(), customer.postal_code.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if !locality.is_empty() {
        lines.push(format!("  {locality}"));
    }
    lines.push(String::new());

    if facts.cart.is_empty() {
        lines.push("(no line items on record)".to_string());
    } else {
        lines.push("Items:".to_string());
        for item in &facts.cart {
            lines.push(format!(
                "  {}  x{}  @ {}  =  {}",
                item.name,
                item.quantity,
                inr(item.unit_price),
                inr(item.line_total())
            ));
        }
    }
    lines.push(String::new());
    match facts.amount {
        Some(amount) => lines.push(format!("Total paid: {}", inr(amount))),
        None if facts.cart.is_empty() => lines.push("Total: as per payment gateway records".to_string()),
        None => lines.push(format!("Total: {}", inr(facts.total()))),
    }
    lines
}

// The content stream is ASCII-only, so the rupee sign stays out of the PDF text.
fn inr(amount: Paise) -> String {
    let value = amount.value();
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!("{sign}Rs. {}.{:02}", abs / 100, abs % 100)
}
