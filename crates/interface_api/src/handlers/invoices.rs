//! Invoice handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use core_kernel::{ClientId, InvoiceId};
use domain_billing::{InvoiceDocument, InvoicePreviewRequest, IssueInvoiceRequest};

use crate::dto::invoices::*;
use crate::{error::ApiError, AppState};

/// Largest accepted invoice document
pub const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

/// Body limit for the invoice form: the document plus its text fields
pub const MAX_INVOICE_FORM_BYTES: usize = MAX_DOCUMENT_BYTES + 64 * 1024;

/// Stores the rendered invoice for a confirmed preview
///
/// Expects a multipart form with the fields `client_id`, `months` (repeated
/// or comma separated), an optional `invoice_number` and the rendered
/// `file`.
pub async fn create_invoice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    let request = read_issue_request(multipart).await?;
    let invoice = state.billing.issue_invoice(request).await?;
    Ok((StatusCode::CREATED, Json(invoice.into())))
}

/// Lists invoices, optionally filtered by `?client_id=`
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<Vec<InvoiceResponse>>, ApiError> {
    let invoices = state.billing.list_invoices(query.client_id).await?;
    Ok(Json(invoices.into_iter().map(Into::into).collect()))
}

/// Gets invoice metadata by ID
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    Ok(Json(state.billing.get_invoice(id).await?.into()))
}

/// Streams the stored invoice document
pub async fn download_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state.billing.get_invoice(id).await?.document;
    let headers = [
        (header::CONTENT_TYPE, document.content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        ),
    ];
    Ok((headers, document.content))
}

async fn read_issue_request(mut multipart: Multipart) -> Result<IssueInvoiceRequest, ApiError> {
    let mut client_id: Option<ClientId> = None;
    let mut months: Vec<String> = Vec::new();
    let mut invoice_number: Option<String> = None;
    let mut document: Option<InvoiceDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("invoice.pdf").to_string();
                let content_type = field.content_type().unwrap_or("application/pdf").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file bytes: {e}")))?
                    .to_vec();
                if content.len() > MAX_DOCUMENT_BYTES {
                    return Err(ApiError::BadRequest("File too large (max 20MB)".to_string()));
                }
                document = Some(InvoiceDocument {
                    file_name,
                    content_type,
                    content,
                });
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read field {other}: {e}")))?;
                match other {
                    "client_id" => {
                        let id = value
                            .trim()
                            .parse()
                            .map_err(|_| ApiError::Validation(format!("invalid client_id {value:?}")))?;
                        client_id = Some(id);
                    }
                    "months" => months.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|m| !m.is_empty())
                            .map(str::to_string),
                    ),
                    "invoice_number" if !value.trim().is_empty() => {
                        invoice_number = Some(value.trim().to_string());
                    }
                    _ => {}
                }
            }
        }
    }

    let client_id = client_id.ok_or_else(|| ApiError::Validation("client_id is required".to_string()))?;
    let document = document.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    Ok(IssueInvoiceRequest {
        preview: InvoicePreviewRequest::new(client_id, months),
        invoice_number,
        document,
    })
}
