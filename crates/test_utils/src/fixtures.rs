//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for billing tests. These fixtures are
//! deterministic: no fixture reads the clock.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{BillingMonth, ClientId, Money, ServiceId};
use domain_billing::{Client, NewClient, Service, ServiceCatalog};
use rust_decimal_macros::dec;

/// Shorthand for a calendar date; panics on an impossible date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// Shorthand for a billing month; panics on an impossible month
pub fn month(year: i32, month: u32) -> BillingMonth {
    BillingMonth::from_ymd(year, month)
        .unwrap_or_else(|_| panic!("invalid fixture month {year}-{month}"))
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Evaluation date far after every fixture month
    pub fn far_future() -> NaiveDate {
        date(2030, 1, 1)
    }

    /// Fixed creation timestamp for records
    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("invalid fixture timestamp"))
    }
}

/// Fixture for money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn rate_100() -> Money {
        Money::new(dec!(100.00))
    }

    pub fn rate_310() -> Money {
        Money::new(dec!(310.00))
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn client() -> ClientId {
        ClientId::new(1)
    }

    pub fn other_client() -> ClientId {
        ClientId::new(2)
    }

    pub fn internet() -> ServiceId {
        ServiceId::new(1)
    }

    pub fn transit() -> ServiceId {
        ServiceId::new(2)
    }

    pub fn colocation() -> ServiceId {
        ServiceId::new(3)
    }
}

/// Fixture for the service catalog
pub struct CatalogFixtures;

impl CatalogFixtures {
    /// Three standard services with ids 1-3
    pub fn services() -> Vec<Service> {
        [
            (IdFixtures::internet(), "Dedicated Internet"),
            (IdFixtures::transit(), "IP Transit"),
            (IdFixtures::colocation(), "Colocation"),
        ]
        .into_iter()
        .map(|(id, name)| Service {
            created_at: TemporalFixtures::created_at(),
            ..Service::new(id, name, "fixtures")
        })
        .collect()
    }

    pub fn catalog() -> ServiceCatalog {
        Self::services().into_iter().collect()
    }
}

/// Fixture for client records
pub struct ClientFixtures;

impl ClientFixtures {
    pub fn new_client(name: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            address: "123 Main St".to_string(),
            contact_person: "Jane Roe".to_string(),
            email: "billing@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
        }
    }

    /// Acme (id 1, active) and Beta (id 2, inactive)
    pub fn clients() -> Vec<Client> {
        let acme = Self::new_client("Acme Corp").into_client(IdFixtures::client(), TemporalFixtures::created_at());
        let beta = Client {
            active: false,
            ..Self::new_client("Beta Ltd").into_client(IdFixtures::other_client(), TemporalFixtures::created_at())
        };
        vec![acme, beta]
    }
}
