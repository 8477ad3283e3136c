//! Store adapters for the billing domain
//!
//! # Available Adapters
//!
//! - **InMemoryClientStore**, **InMemoryAssignmentStore**,
//!   **InMemoryServiceStore**, **InMemoryInvoiceStore**: process-local stores, used by the API server
//!   when no external backend is configured and by tests
//!
//! ```rust,ignore
//! use domain_billing::adapters::InMemoryAssignmentStore;
//! use domain_billing::AssignmentStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn AssignmentStore> = Arc::new(InMemoryAssignmentStore::default());
//! ```

pub mod memory;

pub use memory::{InMemoryAssignmentStore, InMemoryClientStore, InMemoryInvoiceStore, InMemoryServiceStore};
