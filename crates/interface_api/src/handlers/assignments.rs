//! Service assignment handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use core_kernel::AssignmentId;
use domain_billing::{BillingError, NewAssignment, ServiceAssignment};

use crate::dto::assignments::*;
use crate::{error::ApiError, AppState};

/// Starts a service for a client
pub async fn start_assignment(
    State(state): State<AppState>,
    Json(request): Json<NewAssignment>,
) -> Result<(StatusCode, Json<ServiceAssignment>), ApiError> {
    let assignment = state.billing.start_assignment(request).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Lists assignments, optionally filtered by `?client_id=`
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<AssignmentQuery>,
) -> Result<Json<Vec<ServiceAssignment>>, ApiError> {
    Ok(Json(state.billing.list_assignments(query.client_id).await?))
}

/// Stops an assignment
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<AssignmentId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ServiceAssignment>, ApiError> {
    if request.status {
        return Err(BillingError::invalid_state(format!(
            "assignment {id} cannot be reactivated; start a new assignment instead"
        ))
        .into());
    }

    let assignment = state
        .billing
        .stop_assignment(id, request.service_stop_date)
        .await?;
    Ok(Json(assignment))
}
