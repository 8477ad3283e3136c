//! Invoice records and rendering feed
//!
//! Once a preview is confirmed, the rendered document is stored together
//! with the client, an invoice number and the billed months. Rendering
//! itself happens outside this crate; [`InvoiceTable`] is the tabular feed
//! handed to the renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillingMonth, ClientId, InvoiceId, Money};

use crate::preview::{InvoicePreview, InvoicePreviewServiceItem};

/// A rendered invoice document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub file_name: String,
    pub content_type: String,
    /// Raw document bytes, kept out of serialized metadata
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl InvoiceDocument {
    pub fn pdf(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "application/pdf".to_string(),
            content,
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// An invoice ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub client_id: ClientId,
    pub invoice_number: String,
    pub billed_months: Vec<BillingMonth>,
    pub total: Money,
    pub document: InvoiceDocument,
}

impl NewInvoice {
    /// Builds an invoice from a confirmed preview
    pub fn from_preview(
        preview: &InvoicePreview,
        invoice_number: impl Into<String>,
        document: InvoiceDocument,
    ) -> Self {
        Self {
            client_id: preview.client_id,
            invoice_number: invoice_number.into(),
            billed_months: preview.billed_months(),
            total: preview.total(),
            document,
        }
    }
}

/// A stored invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub client_id: ClientId,
    pub billed_months: Vec<BillingMonth>,
    pub total: Money,
    pub document: InvoiceDocument,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn from_new(id: InvoiceId, new: NewInvoice, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            invoice_number: new.invoice_number,
            client_id: new.client_id,
            billed_months: new.billed_months,
            total: new.total,
            document: new.document,
            created_at,
        }
    }
}

/// Generates an invoice number such as `INV-7-202501-0003`
///
/// `sequence` is the highest sequence already used for the client; the
/// generated number takes the next one.
pub fn generate_invoice_number(client_id: ClientId, first_month: BillingMonth, sequence: usize) -> String {
    format!(
        "INV-{}-{:04}{:02}-{:04}",
        client_id,
        first_month.year(),
        first_month.month(),
        sequence + 1
    )
}

/// Columns the renderer can print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceColumn {
    Month,
    Service,
    Days,
    Amount,
    Description,
    LinkCapacity,
    Rate,
}

impl InvoiceColumn {
    pub const ALL: [InvoiceColumn; 7] = [
        InvoiceColumn::Month,
        InvoiceColumn::Service,
        InvoiceColumn::Days,
        InvoiceColumn::Amount,
        InvoiceColumn::Description,
        InvoiceColumn::LinkCapacity,
        InvoiceColumn::Rate,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            InvoiceColumn::Month => "MONTH",
            InvoiceColumn::Service => "SERVICE",
            InvoiceColumn::Days => "DAYS",
            InvoiceColumn::Amount => "AMOUNT",
            InvoiceColumn::Description => "DESCRIPTION",
            InvoiceColumn::LinkCapacity => "LINK CAPACITY",
            InvoiceColumn::Rate => "RATE",
        }
    }

    fn cell(&self, label: &str, item: &InvoicePreviewServiceItem) -> String {
        match self {
            InvoiceColumn::Month => label.to_string(),
            InvoiceColumn::Service => item.service_name.clone(),
            InvoiceColumn::Days => item.prorated_days.to_string(),
            InvoiceColumn::Amount => item.prorated_amount.to_string(),
            InvoiceColumn::Description => item.description.clone(),
            InvoiceColumn::LinkCapacity => item.link_capacity.clone(),
            InvoiceColumn::Rate => item.rate.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

/// Text table of invoice lines, one row per month and service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTable {
    pub columns: Vec<InvoiceColumn>,
    pub rows: Vec<Vec<String>>,
    pub total: Money,
}

impl InvoiceTable {
    /// Lays out the preview using the selected columns, in the given order
    pub fn from_preview(preview: &InvoicePreview, columns: &[InvoiceColumn]) -> Self {
        let rows = preview
            .months
            .iter()
            .flat_map(|month| {
                month.services.iter().map(move |item| {
                    columns.iter().map(|c| c.cell(&month.label, item)).collect()
                })
            })
            .collect();

        Self {
            columns: columns.to_vec(),
            rows,
            total: preview.total(),
        }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(InvoiceColumn::header).collect()
    }
}

/// Sequence part of a number in the generated `INV-{client}-{YYYYMM}-{n}` form
pub fn invoice_sequence(client_id: ClientId, invoice_number: &str) -> Option<usize> {
    let rest = invoice_number.strip_prefix(&format!("INV-{client_id}-"))?;
    let (period, sequence) = rest.split_once('-')?;
    if period.len() != 6 || !period.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    sequence.parse().ok()
}

/// Highest sequence among a client's invoice numbers, 0 when none is generated
///
/// Numbers in other formats, such as ones entered by hand, are skipped.
pub fn last_invoice_sequence<'a>(
    client_id: ClientId,
    invoice_numbers: impl IntoIterator<Item = &'a str>,
) -> usize {
    invoice_numbers
        .into_iter()
        .filter_map(|number| invoice_sequence(client_id, number))
        .max()
        .unwrap_or(0)
}
