//! Service catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_kernel::ServiceId;
use domain_billing::{Service, ServiceUpdate};

use crate::dto::services::*;
use crate::{error::ApiError, AppState};

/// Adds a service to the catalog
pub async fn create_service(
    State(state): State<AppState>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let service = state
        .billing
        .create_service(&request.name, &request.created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Lists services
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, ApiError> {
    Ok(Json(state.billing.list_services().await?))
}

/// Gets a service by ID
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
) -> Result<Json<Service>, ApiError> {
    Ok(Json(state.billing.get_service(id).await?))
}

/// Updates a service's name or active flag
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    Ok(Json(state.billing.update_service(id, request.into()).await?))
}

/// Toggles whether a service can be assigned
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<Service>, ApiError> {
    let update = ServiceUpdate {
        name: None,
        active: Some(request.active),
    };
    Ok(Json(state.billing.update_service(id, update).await?))
}

/// Deletes a service
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
) -> Result<StatusCode, ApiError> {
    state.billing.delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
