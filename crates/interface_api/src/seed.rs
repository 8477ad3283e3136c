//! Startup snapshot for the in-memory stores
//!
//! The snapshot is a JSON document exported from the billing datastore:
//!
//! ```json
//! {
//!   "clients": [{ "id": 7, "name": "Acme Corp", "address": "123 Main St", ... }],
//!   "services": [{ "id": 1, "name": "Dedicated Internet", "active": true, ... }],
//!   "assignments": [{ "id": 10, "client_id": 7, "service_id": 1, ... }]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use domain_billing::{BillingError, Client, Service, ServiceAssignment};
use serde::{Deserialize, Serialize};

/// Clients, services and assignments loaded into the stores at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedSnapshot {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub assignments: Vec<ServiceAssignment>,
}

impl SeedSnapshot {
    /// Reads and validates a snapshot file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        let snapshot: SeedSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parsing seed file {}", path.display()))?;
        snapshot
            .validate()
            .with_context(|| format!("validating seed file {}", path.display()))?;
        Ok(snapshot)
    }

    /// Checks every assignment against its date and rate invariants
    pub fn validate(&self) -> Result<(), BillingError> {
        self.assignments.iter().try_for_each(ServiceAssignment::validate)
    }
}
