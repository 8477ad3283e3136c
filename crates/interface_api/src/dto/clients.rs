//! Client DTOs

use domain_billing::client::DEFAULT_CLIENT_PAGE;
use serde::Deserialize;

/// Paging for `GET /clients`
#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_CLIENT_PAGE
}

#[derive(Debug, Deserialize)]
pub struct ClientStatusRequest {
    pub active: bool,
}
