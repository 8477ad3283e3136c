//! Service catalog DTOs

use domain_billing::ServiceUpdate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateServiceRequest> for ServiceUpdate {
    fn from(request: UpdateServiceRequest) -> Self {
        ServiceUpdate {
            name: request.name.map(|n| n.trim().to_string()),
            active: request.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}
