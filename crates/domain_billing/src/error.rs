//! Billing domain errors

use core_kernel::{AssignmentId, ClientId, InvoiceId, MoneyError, PortError, ServiceId, TemporalError};
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Malformed request or a record violating the assignment invariants
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client not found
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    /// Assignment not found
    #[error("Service assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    /// Service not found
    #[error("Service not found: {0}")]
    ServiceNotFound(ServiceId),

    /// Invoice not found
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// The record cannot move to the requested state
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Calculation error
    #[error("Calculation error: {0}")]
    Calculation(#[from] MoneyError),

    /// Failure in the backing store
    #[error(transparent)]
    Port(#[from] PortError),
}

impl BillingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        BillingError::InvalidInput(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        BillingError::InvalidStateTransition(message.into())
    }
}

impl From<TemporalError> for BillingError {
    fn from(err: TemporalError) -> Self {
        BillingError::InvalidInput(err.to_string())
    }
}
