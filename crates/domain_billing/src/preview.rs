//! Invoice preview request and response shapes
//!
//! A preview is computed fresh for every request and never persisted. Its
//! serialized form is the JSON contract consumed by the dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{AssignmentId, BillingMonth, ClientId, Money, ServiceId};

use crate::error::BillingError;

/// Request for a preview of one client's invoice over some months
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePreviewRequest {
    pub client_id: ClientId,
    /// ISO dates (`YYYY-MM-DD`), each the first day of a month
    pub months: Vec<String>,
}

impl InvoicePreviewRequest {
    pub fn new<I, S>(client_id: ClientId, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client_id,
            months: months.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses the requested months, see [`parse_months`]
    pub fn billing_months(&self) -> Result<Vec<BillingMonth>, BillingError> {
        parse_months(&self.months)
    }
}

/// Parses month strings into billing months
///
/// Order is preserved; a repeated month keeps its first position only.
///
/// # Errors
///
/// Returns `InvalidInput` if the list is empty or any entry is not the ISO
/// date of a first day of month.
pub fn parse_months<S: AsRef<str>>(months: &[S]) -> Result<Vec<BillingMonth>, BillingError> {
    if months.is_empty() {
        return Err(BillingError::invalid_input("at least one month is required"));
    }

    let mut parsed: Vec<BillingMonth> = Vec::with_capacity(months.len());
    for raw in months {
        let month: BillingMonth = raw
            .as_ref()
            .parse()
            .map_err(|e| BillingError::invalid_input(format!("month {:?}: {}", raw.as_ref(), e)))?;
        if !parsed.contains(&month) {
            parsed.push(month);
        }
    }
    Ok(parsed)
}

/// One assignment's charge within one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePreviewServiceItem {
    pub assignment_id: AssignmentId,
    pub service_id: ServiceId,
    pub service_name: String,
    pub description: String,
    pub link_capacity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Money>,
    pub billing_start_date: NaiveDate,
    pub service_start_month: BillingMonth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_stop_date: Option<NaiveDate>,
    pub status: bool,
    pub prorated_days: u32,
    pub prorated_amount: Money,
}

/// All line items of one requested month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePreviewMonth {
    pub month: BillingMonth,
    pub label: String,
    pub days_in_month: u32,
    pub services: Vec<InvoicePreviewServiceItem>,
}

impl InvoicePreviewMonth {
    /// An empty month entry
    pub fn new(month: BillingMonth) -> Self {
        Self {
            month,
            label: month.label(),
            days_in_month: month.days(),
            services: Vec::new(),
        }
    }

    /// Sum of the prorated amounts in this month
    pub fn subtotal(&self) -> Money {
        self.services.iter().map(|s| s.prorated_amount).sum()
    }
}

/// Computed invoice preview for one client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePreview {
    pub client_id: ClientId,
    pub months: Vec<InvoicePreviewMonth>,
}

impl InvoicePreview {
    /// Sum of all prorated amounts across months and services
    pub fn total(&self) -> Money {
        self.months.iter().map(InvoicePreviewMonth::subtotal).sum()
    }

    /// Number of line items across all months
    pub fn line_count(&self) -> usize {
        self.months.iter().map(|m| m.services.len()).sum()
    }

    /// The months covered, in request order
    pub fn billed_months(&self) -> Vec<BillingMonth> {
        self.months.iter().map(|m| m.month).collect()
    }
}
