//! Monthly proration engine
//!
//! Splits each assignment's monthly rate across the requested calendar
//! months in proportion to the days it is billable in each:
//!
//! ```text
//! prorated_days   = |billable range ∩ month|          (inclusive days)
//! prorated_amount = round_half_up(rate * prorated_days / days_in_month, 2)
//! ```
//!
//! The engine is a pure function of its inputs. The evaluation date
//! (`as_of`) is passed in explicitly, so identical inputs always produce
//! identical previews.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{days_overlap, BillingMonth, ClientId, Money};

use crate::assignment::ServiceAssignment;
use crate::catalog::ServiceCatalog;
use crate::error::BillingError;
use crate::preview::{InvoicePreview, InvoicePreviewMonth, InvoicePreviewServiceItem};

/// Billable days and amount of one assignment in one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proration {
    pub days: u32,
    pub amount: Money,
}

/// Prorates a single assignment over a single month
///
/// Returns `None` when the assignment has no billable day in `month`.
/// An absent rate bills zero for the days it covers.
pub fn prorate(
    assignment: &ServiceAssignment,
    month: BillingMonth,
    as_of: NaiveDate,
) -> Result<Option<Proration>, BillingError> {
    let Some(billable) = assignment.billable_range(as_of) else {
        return Ok(None);
    };

    let days = days_overlap(&billable, &month.range());
    if days == 0 {
        return Ok(None);
    }

    let amount = match assignment.rate {
        Some(rate) => rate.prorate(days, month.days())?,
        None => Money::zero(),
    };
    Ok(Some(Proration { days, amount }))
}

/// Computes the invoice preview for a client
///
/// # Arguments
///
/// * `client_id` - Client being billed; other clients' assignments are ignored
/// * `months` - Target months, reported in this order
/// * `assignments` - Snapshot of assignments, active and stopped
/// * `catalog` - Service names for display
/// * `as_of` - Evaluation date for assignments stopped without a stop date
///
/// # Errors
///
/// Returns `InvalidInput` if `months` is empty or one of the client's
/// assignments violates its date invariants. A client without assignments
/// yields months with empty service lists.
pub fn compute_invoice_preview(
    client_id: ClientId,
    months: &[BillingMonth],
    assignments: &[ServiceAssignment],
    catalog: &ServiceCatalog,
    as_of: NaiveDate,
) -> Result<InvoicePreview, BillingError> {
    if months.is_empty() {
        return Err(BillingError::invalid_input("at least one month is required"));
    }

    let mut owned: Vec<&ServiceAssignment> = assignments
        .iter()
        .filter(|a| a.client_id == client_id)
        .collect();
    for assignment in &owned {
        assignment.validate()?;
    }
    owned.sort_by_key(|a| a.id);

    let mut preview_months = Vec::with_capacity(months.len());
    for &month in months {
        let mut entry = InvoicePreviewMonth::new(month);

        for assignment in &owned {
            if let Some(proration) = prorate(assignment, month, as_of)? {
                entry.services.push(line_item(assignment, proration, catalog));
            }
        }

        debug!(
            client_id = %client_id,
            month = %month,
            services = entry.services.len(),
            subtotal = %entry.subtotal(),
            "Prorated month"
        );
        preview_months.push(entry);
    }

    Ok(InvoicePreview {
        client_id,
        months: preview_months,
    })
}

fn line_item(
    assignment: &ServiceAssignment,
    proration: Proration,
    catalog: &ServiceCatalog,
) -> InvoicePreviewServiceItem {
    InvoicePreviewServiceItem {
        assignment_id: assignment.id,
        service_id: assignment.service_id,
        service_name: catalog.display_name(assignment.service_id),
        description: assignment.description.clone(),
        link_capacity: assignment.link_capacity.clone(),
        rate: assignment.rate,
        billing_start_date: assignment.billing_start_date,
        service_start_month: assignment.service_start_month,
        service_stop_date: assignment.service_stop_date,
        status: assignment.status,
        prorated_days: proration.days,
        prorated_amount: proration.amount,
    }
}
