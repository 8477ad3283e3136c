//! Core Kernel - Foundational types and utilities for service billing
//!
//! This crate provides the fundamental building blocks used across the workspace:
//! - Money types with precise decimal arithmetic and half-up rounding
//! - Calendar types for billing months and inclusive date ranges
//! - Common identifiers and port errors

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, MoneyError};
pub use temporal::{BillingMonth, DateRange, Timezone, TemporalError, days_in_month, days_overlap};
pub use identifiers::{ClientId, ServiceId, AssignmentId, InvoiceId};
pub use ports::{PortError, DomainPort};
