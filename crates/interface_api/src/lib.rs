//! HTTP API Layer
//!
//! This crate provides the REST API for the service billing system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for clients, services, assignments, previews and invoices
//! - **Middleware**: Tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::in_memory(config, SeedSnapshot::default()));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod seed;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_billing::adapters::{
    InMemoryAssignmentStore, InMemoryClientStore, InMemoryInvoiceStore, InMemoryServiceStore,
};
use domain_billing::BillingService;

use crate::config::ApiConfig;
use crate::handlers::{assignments, clients, health, invoices, preview, services};
use crate::middleware::audit_middleware;
use crate::seed::SeedSnapshot;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub billing: BillingService,
    pub config: ApiConfig,
}

impl AppState {
    /// State backed by in-memory stores loaded from `seed`
    pub fn in_memory(config: ApiConfig, seed: SeedSnapshot) -> Self {
        let billing = BillingService::new(
            Arc::new(InMemoryClientStore::with_clients(seed.clients)),
            Arc::new(InMemoryAssignmentStore::with_assignments(seed.assignments)),
            Arc::new(InMemoryServiceStore::with_services(seed.services)),
            Arc::new(InMemoryInvoiceStore::default()),
            config.timezone,
        );
        Self { billing, config }
    }
}

/// Creates the main API router
///
/// Collection routes answer with and without a trailing slash. Invoice
/// routes accept bodies up to the document limit; everything else keeps
/// axum's default.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let client_collection = post(clients::create_client).get(clients::list_clients);
    let client_routes = Router::new()
        .route("/clients", client_collection.clone())
        .route("/clients/", client_collection)
        .route("/clients/:id", get(clients::get_client))
        .route("/clients/:id/status", patch(clients::update_client_status));

    let service_collection = post(services::create_service).get(services::list_services);
    let service_routes = Router::new()
        .route("/services", service_collection.clone())
        .route("/services/", service_collection)
        .route(
            "/services/:id",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route("/services/:id/active", patch(services::set_active));

    let assignment_routes = Router::new()
        .route(
            "/services/assignments",
            post(assignments::start_assignment).get(assignments::list_assignments),
        )
        .route("/services/assignments/:id/status", patch(assignments::update_status))
        .route("/services/assignments/preview", post(preview::preview_invoice));

    let invoice_collection = post(invoices::create_invoice).get(invoices::list_invoices);
    let invoice_routes = Router::new()
        .route("/invoices", invoice_collection.clone())
        .route("/invoices/", invoice_collection)
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/download", get(invoices::download_invoice))
        .layer(DefaultBodyLimit::max(invoices::MAX_INVOICE_FORM_BYTES));

    let api_routes = Router::new()
        .merge(client_routes)
        .merge(service_routes)
        .merge(assignment_routes)
        .merge(invoice_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
