//! Invoice preview handler

use axum::{
    extract::{Query, State},
    Json,
};
use domain_billing::{InvoicePreview, InvoicePreviewRequest};

use crate::dto::preview::PreviewQuery;
use crate::{error::ApiError, AppState};

/// Computes the invoice preview for a client and a set of months
pub async fn preview_invoice(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
    Json(request): Json<InvoicePreviewRequest>,
) -> Result<Json<InvoicePreview>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(|| state.billing.today());
    Ok(Json(state.billing.preview_as_of(&request, as_of).await?))
}
