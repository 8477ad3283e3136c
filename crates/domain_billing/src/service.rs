//! Billing application service
//!
//! Orchestrates the stores and the proration engine. A preview reads one
//! snapshot of the client's assignments and the catalog, then computes
//! without touching the stores again; callers re-run it to see later edits.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use core_kernel::{AssignmentId, ClientId, InvoiceId, PortError, ServiceId, Timezone};

use crate::assignment::{NewAssignment, ServiceAssignment};
use crate::catalog::{Service, ServiceCatalog, ServiceUpdate};
use crate::client::{Client, NewClient};
use crate::error::BillingError;
use crate::invoice::{generate_invoice_number, last_invoice_sequence, Invoice, InvoiceDocument, NewInvoice};
use crate::ports::{AssignmentStore, ClientStore, InvoiceStore, ServiceStore};
use crate::preview::{InvoicePreview, InvoicePreviewRequest};
use crate::proration::compute_invoice_preview;

/// Generated numbers tried before an issue gives up on conflicts
const MAX_NUMBERING_ATTEMPTS: usize = 8;

/// Request to store an invoice for a confirmed preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueInvoiceRequest {
    pub preview: InvoicePreviewRequest,
    /// Generated from the client and first month when absent
    pub invoice_number: Option<String>,
    pub document: InvoiceDocument,
}

/// Service for previewing and issuing client invoices
///
/// Holds the store ports and the billing timezone, which decides what
/// "today" is for assignments stopped without a stop date.
#[derive(Clone)]
pub struct BillingService {
    clients: Arc<dyn ClientStore>,
    assignments: Arc<dyn AssignmentStore>,
    services: Arc<dyn ServiceStore>,
    invoices: Arc<dyn InvoiceStore>,
    timezone: Timezone,
}

impl BillingService {
    pub fn new(
        clients: Arc<dyn ClientStore>,
        assignments: Arc<dyn AssignmentStore>,
        services: Arc<dyn ServiceStore>,
        invoices: Arc<dyn InvoiceStore>,
        timezone: Timezone,
    ) -> Self {
        Self {
            clients,
            assignments,
            services,
            invoices,
            timezone,
        }
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Current date in the billing timezone
    pub fn today(&self) -> NaiveDate {
        self.timezone.today()
    }

    /// Computes an invoice preview evaluated today
    pub async fn preview(&self, request: &InvoicePreviewRequest) -> Result<InvoicePreview, BillingError> {
        self.preview_as_of(request, self.today()).await
    }

    /// Computes an invoice preview evaluated on `as_of`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed month list or an assignment
    /// that violates its invariants, and `Port` if a store fails.
    #[instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub async fn preview_as_of(
        &self,
        request: &InvoicePreviewRequest,
        as_of: NaiveDate,
    ) -> Result<InvoicePreview, BillingError> {
        let months = request.billing_months()?;
        let assignments = self.assignments.list_assignments(request.client_id).await?;
        let catalog = self.catalog().await?;

        compute_invoice_preview(request.client_id, &months, &assignments, &catalog, as_of)
    }

    /// Name lookup for every service in the catalog
    pub async fn catalog(&self) -> Result<ServiceCatalog, BillingError> {
        Ok(self.services.list_services().await?.into_iter().collect())
    }

    /// Registers a client
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name or address or a malformed
    /// email.
    pub async fn create_client(&self, new: NewClient) -> Result<Client, BillingError> {
        let new = new.normalized();
        new.validate()?;

        let client = self.clients.create_client(new).await?;
        info!(client_id = %client.id, name = %client.name, "Client registered");
        Ok(client)
    }

    /// Lists clients in id order, `limit` records after the first `skip`
    pub async fn list_clients(&self, skip: usize, limit: usize) -> Result<Vec<Client>, BillingError> {
        Ok(self.clients.list_clients(skip, limit).await?)
    }

    pub async fn get_client(&self, id: ClientId) -> Result<Client, BillingError> {
        self.clients
            .get_client(id)
            .await
            .map_err(|e| not_found_or(e, BillingError::ClientNotFound(id)))
    }

    /// Activates or deactivates a client
    ///
    /// Assignments are left alone: stopping them is a separate decision.
    pub async fn set_client_active(&self, id: ClientId, active: bool) -> Result<Client, BillingError> {
        let client = self
            .clients
            .set_client_active(id, active, Utc::now())
            .await
            .map_err(|e| not_found_or(e, BillingError::ClientNotFound(id)))?;
        info!(client_id = %client.id, active, "Client status changed");
        Ok(client)
    }

    /// Starts a service for a client
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the dates or rate are invalid and
    /// `ServiceNotFound` if the service does not exist.
    pub async fn start_assignment(&self, new: NewAssignment) -> Result<ServiceAssignment, BillingError> {
        new.validate()?;
        self.get_service(new.service_id).await?;

        let assignment = self.assignments.create_assignment(new).await?;
        info!(
            assignment_id = %assignment.id,
            client_id = %assignment.client_id,
            service_id = %assignment.service_id,
            billing_start_date = %assignment.billing_start_date,
            "Service assignment started"
        );
        Ok(assignment)
    }

    /// Lists assignments, optionally for one client only
    pub async fn list_assignments(&self, client_id: Option<ClientId>) -> Result<Vec<ServiceAssignment>, BillingError> {
        let assignments = match client_id {
            Some(client_id) => self.assignments.list_assignments(client_id).await?,
            None => self.assignments.list_all().await?,
        };
        Ok(assignments)
    }

    /// Stops an assignment, billing through `stop_date` (today when absent)
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound` for an unknown id and
    /// `InvalidStateTransition` if the assignment is already stopped.
    pub async fn stop_assignment(
        &self,
        id: AssignmentId,
        stop_date: Option<NaiveDate>,
    ) -> Result<ServiceAssignment, BillingError> {
        let stop_date = stop_date.unwrap_or_else(|| self.today());
        self.assignments
            .stop_assignment(id, stop_date, Utc::now())
            .await
            .map_err(|e| match e {
                BillingError::Port(e) => not_found_or(e, BillingError::AssignmentNotFound(id)),
                other => other,
            })
    }

    /// Stores an invoice for the previewed months
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the preview has no line items.
    pub async fn issue_invoice(&self, request: IssueInvoiceRequest) -> Result<Invoice, BillingError> {
        let preview = self.preview(&request.preview).await?;
        if preview.line_count() == 0 {
            return Err(BillingError::invalid_input(format!(
                "client {} has nothing billable in the requested months",
                preview.client_id
            )));
        }

        let invoice = match request.invoice_number {
            Some(number) => {
                let new = NewInvoice::from_preview(&preview, number, request.document);
                self.invoices.create_invoice(new).await?
            }
            None => self.create_numbered_invoice(&preview, request.document).await?,
        };

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            client_id = %invoice.client_id,
            total = %invoice.total,
            "Invoice issued"
        );
        Ok(invoice)
    }

    /// Stores an invoice under the next free generated number
    ///
    /// Starts after the client's highest generated sequence and moves on
    /// when a concurrent issue claims the number first.
    async fn create_numbered_invoice(
        &self,
        preview: &InvoicePreview,
        document: InvoiceDocument,
    ) -> Result<Invoice, BillingError> {
        let issued = self.invoices.list_client_invoices(preview.client_id).await?;
        let mut sequence =
            last_invoice_sequence(preview.client_id, issued.iter().map(|i| i.invoice_number.as_str()));
        let first_month = preview.months[0].month;

        for _ in 0..MAX_NUMBERING_ATTEMPTS {
            let number = generate_invoice_number(preview.client_id, first_month, sequence);
            match self
                .invoices
                .create_invoice(NewInvoice::from_preview(preview, number, document.clone()))
                .await
            {
                Err(PortError::Conflict { message }) => {
                    warn!(client_id = %preview.client_id, %message, "Invoice number taken, trying next");
                    sequence += 1;
                }
                result => return result.map_err(BillingError::from),
            }
        }
        Err(BillingError::Port(PortError::conflict(format!(
            "no free invoice number for client {} after {} attempts",
            preview.client_id, MAX_NUMBERING_ATTEMPTS
        ))))
    }

    pub async fn list_invoices(&self, client_id: Option<ClientId>) -> Result<Vec<Invoice>, BillingError> {
        let invoices = match client_id {
            Some(client_id) => self.invoices.list_client_invoices(client_id).await?,
            None => self.invoices.list_invoices().await?,
        };
        Ok(invoices)
    }

    pub async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, BillingError> {
        self.invoices
            .get_invoice(id)
            .await
            .map_err(|e| not_found_or(e, BillingError::InvoiceNotFound(id)))
    }

    /// Adds a service to the catalog
    pub async fn create_service(&self, name: &str, created_by: &str) -> Result<Service, BillingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BillingError::invalid_input("service name must not be empty"));
        }
        Ok(self
            .services
            .create_service(name.to_string(), created_by.to_string())
            .await?)
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, BillingError> {
        Ok(self.services.list_services().await?)
    }

    pub async fn get_service(&self, id: ServiceId) -> Result<Service, BillingError> {
        self.services
            .get_service(id)
            .await
            .map_err(|e| not_found_or(e, BillingError::ServiceNotFound(id)))
    }

    pub async fn update_service(&self, id: ServiceId, update: ServiceUpdate) -> Result<Service, BillingError> {
        if update.is_empty() {
            return Err(BillingError::invalid_input("service update has no fields"));
        }
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(BillingError::invalid_input("service name must not be empty"));
        }
        self.services
            .update_service(id, update)
            .await
            .map_err(|e| not_found_or(e, BillingError::ServiceNotFound(id)))
    }

    pub async fn delete_service(&self, id: ServiceId) -> Result<(), BillingError> {
        self.services
            .delete_service(id)
            .await
            .map_err(|e| not_found_or(e, BillingError::ServiceNotFound(id)))
    }

    /// Probes each store once
    pub async fn check_stores(&self) -> Result<(), BillingError> {
        self.clients.list_clients(0, 1).await?;
        self.services.list_services().await?;
        self.invoices.list_invoices().await?;
        self.assignments.list_all().await?;
        Ok(())
    }
}

fn not_found_or(err: PortError, not_found: BillingError) -> BillingError {
    if err.is_not_found() {
        not_found
    } else {
        BillingError::Port(err)
    }
}
