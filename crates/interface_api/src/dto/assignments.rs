//! Service assignment DTOs

use chrono::NaiveDate;
use core_kernel::ClientId;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentQuery {
    pub client_id: Option<ClientId>,
}

/// Status change for an assignment
///
/// Only `status: false` is accepted. The stop date defaults to today in
/// the billing timezone.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: bool,
    #[serde(default)]
    pub service_stop_date: Option<NaiveDate>,
}
