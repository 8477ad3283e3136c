//! Invoice preview DTOs

use chrono::NaiveDate;
use serde::Deserialize;

/// Query string of the preview endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// Evaluation date; today in the billing timezone when absent
    pub as_of: Option<NaiveDate>,
}
