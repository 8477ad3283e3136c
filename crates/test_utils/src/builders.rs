//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{AssignmentId, BillingMonth, ClientId, Money, ServiceId};
use domain_billing::{NewAssignment, ServiceAssignment};
use rust_decimal::Decimal;

use crate::fixtures::{date, IdFixtures, MoneyFixtures, TemporalFixtures};

/// Builder for service assignments
///
/// Defaults: client 1, service 1, billing from 2025-01-01, rate 100.00,
/// active, no stop date. The service start month follows the billing
/// start unless set explicitly.
#[derive(Debug, Clone)]
pub struct AssignmentBuilder {
    id: AssignmentId,
    client_id: ClientId,
    service_id: ServiceId,
    service_start_month: Option<BillingMonth>,
    billing_start_date: NaiveDate,
    description: String,
    link_capacity: String,
    rate: Option<Money>,
    status: bool,
    service_stop_date: Option<NaiveDate>,
}

impl AssignmentBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            id: AssignmentId::new(id),
            client_id: IdFixtures::client(),
            service_id: IdFixtures::internet(),
            service_start_month: None,
            billing_start_date: date(2025, 1, 1),
            description: "Primary uplink".to_string(),
            link_capacity: "100 Mbps".to_string(),
            rate: Some(MoneyFixtures::rate_100()),
            status: true,
            service_stop_date: None,
        }
    }

    pub fn client(mut self, id: i64) -> Self {
        self.client_id = ClientId::new(id);
        self
    }

    pub fn service(mut self, id: i64) -> Self {
        self.service_id = ServiceId::new(id);
        self
    }

    /// Sets the first billable day
    pub fn billing_start(mut self, year: i32, month: u32, day: u32) -> Self {
        self.billing_start_date = date(year, month, day);
        self
    }

    pub fn service_start_month(mut self, month: BillingMonth) -> Self {
        self.service_start_month = Some(month);
        self
    }

    pub fn rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(Money::new(rate));
        self
    }

    pub fn no_rate(mut self) -> Self {
        self.rate = None;
        self
    }

    /// Marks the assignment stopped with the given last billable day
    pub fn stopped_on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.status = false;
        self.service_stop_date = Some(date(year, month, day));
        self
    }

    /// Marks the assignment inactive without recording a stop date
    pub fn inactive(mut self) -> Self {
        self.status = false;
        self.service_stop_date = None;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn link_capacity(mut self, capacity: impl Into<String>) -> Self {
        self.link_capacity = capacity.into();
        self
    }

    /// The creation request for this assignment
    pub fn new_assignment(&self) -> NewAssignment {
        NewAssignment {
            client_id: self.client_id,
            service_id: self.service_id,
            service_start_month: self
                .service_start_month
                .unwrap_or_else(|| BillingMonth::containing(self.billing_start_date)),
            billing_start_date: self.billing_start_date,
            description: self.description.clone(),
            link_capacity: self.link_capacity.clone(),
            rate: self.rate,
            created_by: "builder".to_string(),
        }
    }

    /// Builds the assignment without validating it
    pub fn build(self) -> ServiceAssignment {
        let mut assignment = self
            .new_assignment()
            .into_assignment(self.id, TemporalFixtures::created_at());
        assignment.status = self.status;
        assignment.service_stop_date = self.service_stop_date;
        assignment
    }
}
