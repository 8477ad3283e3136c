//! Service assignments
//!
//! An assignment binds one client to one service from a billing start date,
//! at an optional monthly rate, until it is stopped. Stopping is one-way:
//! a restarted service gets a new assignment.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{AssignmentId, BillingMonth, ClientId, DateRange, Money, ServiceId};

use crate::error::BillingError;

/// One service sold to one client over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAssignment {
    pub id: AssignmentId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    /// Month in which the service nominally began
    pub service_start_month: BillingMonth,
    /// First billable day
    pub billing_start_date: NaiveDate,
    pub description: String,
    pub link_capacity: String,
    /// Monthly recurring charge; `None` bills nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Money>,
    /// `true` while the service is billable
    pub status: bool,
    /// Last billable day, recorded when the service is stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_stop_date: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServiceAssignment {
    /// Checks the date and rate invariants of the record
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if billing starts before the service start
    /// month, the stop date precedes the billing start, or the rate is
    /// negative or carries fractions of a cent.
    pub fn validate(&self) -> Result<(), BillingError> {
        let subject = format!("assignment {}", self.id);
        check_dates(&subject, self.service_start_month, self.billing_start_date, self.rate)?;

        if let Some(stop) = self.service_stop_date {
            if stop < self.billing_start_date {
                return Err(BillingError::invalid_input(format!(
                    "assignment {}: service stop date {} is before billing start date {}",
                    self.id, stop, self.billing_start_date
                )));
            }
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status
    }

    pub fn is_stopped(&self) -> bool {
        !self.status || self.service_stop_date.is_some()
    }

    /// The days this assignment bills, evaluated on `as_of`
    ///
    /// A recorded stop date is the authoritative last day. An assignment
    /// marked inactive without a stop date is treated as stopped at the
    /// start of the month containing `as_of`: it bills nothing from that
    /// month onward. Returns `None` when no day is billable.
    pub fn billable_range(&self, as_of: NaiveDate) -> Option<DateRange> {
        let end = match (self.service_stop_date, self.status) {
            (Some(stop), _) => Some(stop),
            (None, true) => None,
            (None, false) => {
                let cutoff = BillingMonth::containing(as_of).first_day();
                Some(cutoff.checked_sub_days(Days::new(1))?)
            }
        };
        DateRange::new(self.billing_start_date, end).ok()
    }

    /// Stops the assignment with `stop_date` as its last billable day
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the assignment is already
    /// stopped, or `InvalidInput` if `stop_date` precedes the billing start.
    pub fn stop(&mut self, stop_date: NaiveDate, at: DateTime<Utc>) -> Result<(), BillingError> {
        if self.is_stopped() {
            return Err(BillingError::invalid_state(format!(
                "assignment {} is already stopped",
                self.id
            )));
        }
        if stop_date < self.billing_start_date {
            return Err(BillingError::invalid_input(format!(
                "assignment {}: service stop date {} is before billing start date {}",
                self.id, stop_date, self.billing_start_date
            )));
        }

        self.status = false;
        self.service_stop_date = Some(stop_date);
        self.updated_at = Some(at);

        info!(
            assignment_id = %self.id,
            client_id = %self.client_id,
            stop_date = %stop_date,
            "Service assignment stopped"
        );
        Ok(())
    }
}

/// Request to start a service for a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub client_id: ClientId,
    pub service_id: ServiceId,
    pub service_start_month: BillingMonth,
    pub billing_start_date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link_capacity: String,
    #[serde(default)]
    pub rate: Option<Money>,
    #[serde(default)]
    pub created_by: String,
}

impl NewAssignment {
    /// Checks the same date and rate invariants as [`ServiceAssignment::validate`]
    pub fn validate(&self) -> Result<(), BillingError> {
        check_dates("new assignment", self.service_start_month, self.billing_start_date, self.rate)
    }

    /// Builds the active assignment stored under `id`
    pub fn into_assignment(self, id: AssignmentId, created_at: DateTime<Utc>) -> ServiceAssignment {
        ServiceAssignment {
            id,
            client_id: self.client_id,
            service_id: self.service_id,
            service_start_month: self.service_start_month,
            billing_start_date: self.billing_start_date,
            description: self.description,
            link_capacity: self.link_capacity,
            rate: self.rate,
            status: true,
            service_stop_date: None,
            created_by: self.created_by,
            created_at,
            updated_at: None,
        }
    }
}

fn check_dates(
    subject: &str,
    start_month: BillingMonth,
    billing_start: NaiveDate,
    rate: Option<Money>,
) -> Result<(), BillingError> {
    if billing_start < start_month.first_day() {
        return Err(BillingError::invalid_input(format!(
            "{}: billing start date {} is before service start month {}",
            subject, billing_start, start_month
        )));
    }
    if let Some(rate) = rate {
        if rate.is_negative() {
            return Err(BillingError::invalid_input(format!(
                "{subject}: rate must not be negative"
            )));
        }
        if !rate.is_whole_cents() {
            return Err(BillingError::invalid_input(format!(
                "{subject}: rate {} has fractions of a cent",
                rate.amount()
            )));
        }
    }
    Ok(())
}
