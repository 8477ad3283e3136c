//! Invoice DTOs

use chrono::{DateTime, Utc};
use core_kernel::{BillingMonth, ClientId, InvoiceId, Money};
use domain_billing::Invoice;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    pub client_id: Option<ClientId>,
}

/// Invoice metadata, without the document bytes
#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub client_id: ClientId,
    pub billed_months: Vec<BillingMonth>,
    pub total: Money,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            size: invoice.document.size(),
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            client_id: invoice.client_id,
            billed_months: invoice.billed_months,
            total: invoice.total,
            file_name: invoice.document.file_name,
            content_type: invoice.document.content_type,
            created_at: invoice.created_at,
        }
    }
}
