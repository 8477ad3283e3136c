//! In-memory store adapters
//!
//! Each store keeps its records in a `BTreeMap` behind a `tokio` `RwLock`
//! and hands out ids from an atomic counter, starting after the highest
//! seeded id. Listings come back in ascending id order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use core_kernel::{AssignmentId, ClientId, DomainPort, InvoiceId, PortError, ServiceId};

use crate::assignment::{NewAssignment, ServiceAssignment};
use crate::client::{Client, NewClient};
use crate::catalog::{Service, ServiceUpdate};
use crate::error::BillingError;
use crate::invoice::{Invoice, NewInvoice};
use crate::ports::{AssignmentStore, ClientStore, InvoiceStore, ServiceStore};

fn next_after(max: Option<i64>) -> AtomicI64 {
    AtomicI64::new(max.unwrap_or(0) + 1)
}

/// Client store backed by process memory
#[derive(Debug)]
pub struct InMemoryClientStore {
    records: RwLock<BTreeMap<ClientId, Client>>,
    next_id: AtomicI64,
}

impl Default for InMemoryClientStore {
    fn default() -> Self {
        Self::with_clients(Vec::new())
    }
}

impl InMemoryClientStore {
    pub fn with_clients(clients: Vec<Client>) -> Self {
        let records: BTreeMap<_, _> = clients.into_iter().map(|c| (c.id, c)).collect();
        let next_id = next_after(records.keys().next_back().map(|id| id.value()));
        Self {
            records: RwLock::new(records),
            next_id,
        }
    }
}

impl DomainPort for InMemoryClientStore {}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn list_clients(&self, skip: usize, limit: usize) -> Result<Vec<Client>, PortError> {
        let records = self.records.read().await;
        Ok(records.values().skip(skip).take(limit).cloned().collect())
    }

    async fn get_client(&self, id: ClientId) -> Result<Client, PortError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Client", id))
    }

    async fn create_client(&self, new: NewClient) -> Result<Client, PortError> {
        let id = ClientId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let client = new.into_client(id, Utc::now());
        self.records.write().await.insert(id, client.clone());
        Ok(client)
    }

    async fn set_client_active(&self, id: ClientId, active: bool, at: DateTime<Utc>) -> Result<Client, PortError> {
        let mut records = self.records.write().await;
        let client = records
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Client", id))?;
        client.active = active;
        client.updated_at = Some(at);
        Ok(client.clone())
    }
}

/// Assignment store backed by process memory
#[derive(Debug)]
pub struct InMemoryAssignmentStore {
    records: RwLock<BTreeMap<AssignmentId, ServiceAssignment>>,
    next_id: AtomicI64,
}

impl Default for InMemoryAssignmentStore {
    fn default() -> Self {
        Self::with_assignments(Vec::new())
    }
}

impl InMemoryAssignmentStore {
    /// Creates a store pre-loaded with existing records
    pub fn with_assignments(assignments: Vec<ServiceAssignment>) -> Self {
        let records: BTreeMap<_, _> = assignments.into_iter().map(|a| (a.id, a)).collect();
        let next_id = next_after(records.keys().next_back().map(|id| id.value()));
        Self {
            records: RwLock::new(records),
            next_id,
        }
    }
}

impl DomainPort for InMemoryAssignmentStore {}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn list_assignments(&self, client_id: ClientId) -> Result<Vec<ServiceAssignment>, PortError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<ServiceAssignment>, PortError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get_assignment(&self, id: AssignmentId) -> Result<ServiceAssignment, PortError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("ServiceAssignment", id))
    }

    async fn create_assignment(&self, new: NewAssignment) -> Result<ServiceAssignment, PortError> {
        let id = AssignmentId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let assignment = new.into_assignment(id, Utc::now());
        self.records.write().await.insert(id, assignment.clone());
        Ok(assignment)
    }

    async fn stop_assignment(
        &self,
        id: AssignmentId,
        stop_date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<ServiceAssignment, BillingError> {
        let mut records = self.records.write().await;
        let assignment = records
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("ServiceAssignment", id))?;
        assignment.stop(stop_date, at)?;
        Ok(assignment.clone())
    }
}

/// Service catalog store backed by process memory
#[derive(Debug)]
pub struct InMemoryServiceStore {
    records: RwLock<BTreeMap<ServiceId, Service>>,
    next_id: AtomicI64,
}

impl Default for InMemoryServiceStore {
    fn default() -> Self {
        Self::with_services(Vec::new())
    }
}

impl InMemoryServiceStore {
    pub fn with_services(services: Vec<Service>) -> Self {
        let records: BTreeMap<_, _> = services.into_iter().map(|s| (s.id, s)).collect();
        let next_id = next_after(records.keys().next_back().map(|id| id.value()));
        Self {
            records: RwLock::new(records),
            next_id,
        }
    }
}

impl DomainPort for InMemoryServiceStore {}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn list_services(&self) -> Result<Vec<Service>, PortError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get_service(&self, id: ServiceId) -> Result<Service, PortError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Service", id))
    }

    async fn create_service(&self, name: String, created_by: String) -> Result<Service, PortError> {
        let mut records = self.records.write().await;
        if records.values().any(|s| s.name.eq_ignore_ascii_case(&name)) {
            return Err(PortError::conflict(format!("service {name:?} already exists")));
        }
        let id = ServiceId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let service = Service::new(id, name, created_by);
        records.insert(id, service.clone());
        Ok(service)
    }

    async fn update_service(&self, id: ServiceId, update: ServiceUpdate) -> Result<Service, PortError> {
        let mut records = self.records.write().await;
        if let Some(name) = &update.name {
            if records
                .values()
                .any(|s| s.id != id && s.name.eq_ignore_ascii_case(name))
            {
                return Err(PortError::conflict(format!("service {name:?} already exists")));
            }
        }
        let service = records
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Service", id))?;
        update.apply(service, Utc::now());
        Ok(service.clone())
    }

    async fn delete_service(&self, id: ServiceId) -> Result<(), PortError> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Service", id))
    }
}

/// Invoice store backed by process memory
#[derive(Debug)]
pub struct InMemoryInvoiceStore {
    records: RwLock<BTreeMap<InvoiceId, Invoice>>,
    next_id: AtomicI64,
}

impl Default for InMemoryInvoiceStore {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: next_after(None),
        }
    }
}

impl DomainPort for InMemoryInvoiceStore {}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn create_invoice(&self, new: NewInvoice) -> Result<Invoice, PortError> {
        let mut records = self.records.write().await;
        if records.values().any(|i| i.invoice_number == new.invoice_number) {
            return Err(PortError::conflict(format!(
                "invoice number {} already exists",
                new.invoice_number
            )));
        }
        let id = InvoiceId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let invoice = Invoice::from_new(id, new, Utc::now());
        records.insert(id, invoice.clone());
        Ok(invoice)
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, PortError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn list_client_invoices(&self, client_id: ClientId) -> Result<Vec<Invoice>, PortError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|i| i.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Invoice", id))
    }
}
