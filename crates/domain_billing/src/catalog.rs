//! Service catalog
//!
//! Services are the products that can be assigned to clients. The proration
//! engine only needs their names, for display on line items.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::ServiceId;

/// A sellable service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Service {
    /// Creates an active service
    pub fn new(id: ServiceId, name: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            created_by: created_by.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Partial update of a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl ServiceUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.active.is_none()
    }

    /// Applies the update, stamping `updated_at`
    pub fn apply(self, service: &mut Service, at: DateTime<Utc>) {
        if let Some(name) = self.name {
            service.name = name;
        }
        if let Some(active) = self.active {
            service.active = active;
        }
        service.updated_at = Some(at);
    }
}

/// Name lookup table for services
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    names: BTreeMap<ServiceId, String>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ServiceId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn get(&self, id: ServiceId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the service name, or a placeholder when the id is unknown
    ///
    /// A dangling service reference is a display gap, not a billing error,
    /// so it is logged and the preview carries on.
    pub fn display_name(&self, id: ServiceId) -> String {
        match self.get(id) {
            Some(name) => name.to_string(),
            None => {
                warn!(service_id = %id, "Unknown service referenced by assignment");
                unknown_service_name(id)
            }
        }
    }
}

impl FromIterator<Service> for ServiceCatalog {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|s| (s.id, s.name)).collect(),
        }
    }
}

impl<'a> FromIterator<&'a Service> for ServiceCatalog {
    fn from_iter<I: IntoIterator<Item = &'a Service>>(iter: I) -> Self {
        iter.into_iter().cloned().collect()
    }
}

/// Placeholder shown for a service id missing from the catalog
pub fn unknown_service_name(id: ServiceId) -> String {
    format!("Unknown service #{id}")
}
