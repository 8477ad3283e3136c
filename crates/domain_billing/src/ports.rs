//! Billing Domain Ports
//!
//! Clients, services, assignments and invoices live in an external
//! datastore. These traits are the only way the billing domain reaches it;
//! adapters decide where the data actually lives.
//!
//! ```rust,ignore
//! let service = BillingService::new(
//!     Arc::new(InMemoryClientStore::default()),
//!     Arc::new(InMemoryAssignmentStore::default()),
//!     Arc::new(InMemoryServiceStore::default()),
//!     Arc::new(InMemoryInvoiceStore::default()),
//!     Timezone::default(),
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use core_kernel::{AssignmentId, ClientId, DomainPort, InvoiceId, PortError, ServiceId};

use crate::assignment::{NewAssignment, ServiceAssignment};
use crate::client::{Client, NewClient};
use crate::catalog::{Service, ServiceUpdate};
use crate::error::BillingError;
use crate::invoice::{Invoice, NewInvoice};

/// Access to client records
#[async_trait]
pub trait ClientStore: DomainPort {
    /// One page of clients in ascending id order
    async fn list_clients(&self, skip: usize, limit: usize) -> Result<Vec<Client>, PortError>;

    async fn get_client(&self, id: ClientId) -> Result<Client, PortError>;

    /// Stores a new, already validated client and returns it with its id
    async fn create_client(&self, new: NewClient) -> Result<Client, PortError>;

    async fn set_client_active(&self, id: ClientId, active: bool, at: DateTime<Utc>) -> Result<Client, PortError>;
}

/// Access to service assignments
#[async_trait]
pub trait AssignmentStore: DomainPort {
    /// All assignments of a client, active and stopped
    async fn list_assignments(&self, client_id: ClientId) -> Result<Vec<ServiceAssignment>, PortError>;

    /// Every assignment in the store
    async fn list_all(&self) -> Result<Vec<ServiceAssignment>, PortError>;

    async fn get_assignment(&self, id: AssignmentId) -> Result<ServiceAssignment, PortError>;

    /// Stores a new, already validated assignment and returns it with its id
    async fn create_assignment(&self, new: NewAssignment) -> Result<ServiceAssignment, PortError>;

    /// Stops an assignment and returns the stored record
    ///
    /// The already-stopped check and the write happen as one step, so of
    /// two concurrent stops exactly one succeeds. Fails with the error of
    /// [`ServiceAssignment::stop`] when the transition is not allowed.
    async fn stop_assignment(
        &self,
        id: AssignmentId,
        stop_date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<ServiceAssignment, BillingError>;
}

/// Access to the service catalog
#[async_trait]
pub trait ServiceStore: DomainPort {
    async fn list_services(&self) -> Result<Vec<Service>, PortError>;

    async fn get_service(&self, id: ServiceId) -> Result<Service, PortError>;

    async fn create_service(&self, name: String, created_by: String) -> Result<Service, PortError>;

    async fn update_service(&self, id: ServiceId, update: ServiceUpdate) -> Result<Service, PortError>;

    async fn delete_service(&self, id: ServiceId) -> Result<(), PortError>;
}

/// Persistence for issued invoices
#[async_trait]
pub trait InvoiceStore: DomainPort {
    async fn create_invoice(&self, new: NewInvoice) -> Result<Invoice, PortError>;

    async fn list_invoices(&self) -> Result<Vec<Invoice>, PortError>;

    async fn list_client_invoices(&self, client_id: ClientId) -> Result<Vec<Invoice>, PortError>;

    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError>;
}
