//! Client handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use core_kernel::ClientId;
use domain_billing::{Client, NewClient};

use crate::dto::clients::*;
use crate::{error::ApiError, AppState};

/// Registers a client
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = state.billing.create_client(request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Lists clients, paged by `?skip=&limit=`
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.billing.list_clients(query.skip, query.limit).await?))
}

/// Gets a client by ID
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> Result<Json<Client>, ApiError> {
    Ok(Json(state.billing.get_client(id).await?))
}

/// Activates or deactivates a client
pub async fn update_client_status(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    Json(request): Json<ClientStatusRequest>,
) -> Result<Json<Client>, ApiError> {
    Ok(Json(state.billing.set_client_active(id, request.active).await?))
}
