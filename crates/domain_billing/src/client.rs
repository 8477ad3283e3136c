//! Client records
//!
//! A client is the billed party. Assignments and invoices refer to it by
//! id; the record itself carries contact details and an active flag that
//! the back office toggles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ClientId;

use crate::error::BillingError;

/// Default page size for client listings
pub const DEFAULT_CLIENT_PAGE: usize = 100;

/// A billed client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request to register a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl NewClient {
    /// Trims every field
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    /// Checks the required fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name or address, or an email
    /// without a local part and domain.
    pub fn validate(&self) -> Result<(), BillingError> {
        if self.name.trim().is_empty() {
            return Err(BillingError::invalid_input("client name must not be empty"));
        }
        if self.address.trim().is_empty() {
            return Err(BillingError::invalid_input("client address must not be empty"));
        }
        let email = self.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            return Err(BillingError::invalid_input(format!("invalid client email {email:?}")));
        }
        Ok(())
    }

    /// Builds the active client stored under `id`
    pub fn into_client(self, id: ClientId, created_at: DateTime<Utc>) -> Client {
        Client {
            id,
            name: self.name,
            address: self.address,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            active: true,
            created_at,
            updated_at: None,
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}
