//! Billing Domain - Monthly Service Proration
//!
//! This crate turns service assignments into invoice previews and stored
//! invoices for a client, and keeps the client and service records those
//! assignments refer to.
//!
//! # Proration
//!
//! Every assignment carries a monthly rate and a billable date range. For
//! each requested month the engine bills the days of that range falling in
//! the month:
//!
//! - A full month bills the rate exactly
//! - A partial month bills `rate * days / days_in_month`, rounded half-up
//!   to cents
//! - A month outside the range has no line item
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{compute_invoice_preview, ServiceCatalog};
//!
//! let preview = compute_invoice_preview(client_id, &months, &assignments, &catalog, today)?;
//! println!("total due: {}", preview.total());
//! ```

pub mod adapters;
pub mod assignment;
pub mod catalog;
pub mod client;
pub mod error;
pub mod invoice;
pub mod ports;
pub mod preview;
pub mod proration;
pub mod service;

pub use assignment::{NewAssignment, ServiceAssignment};
pub use catalog::{Service, ServiceCatalog, ServiceUpdate};
pub use client::{Client, NewClient};
pub use error::BillingError;
pub use invoice::{Invoice, InvoiceColumn, InvoiceDocument, InvoiceTable, NewInvoice};
pub use ports::{AssignmentStore, ClientStore, InvoiceStore, ServiceStore};
pub use preview::{InvoicePreview, InvoicePreviewMonth, InvoicePreviewRequest, InvoicePreviewServiceItem};
pub use proration::{compute_invoice_preview, prorate, Proration};
pub use service::{BillingService, IssueInvoiceRequest};
