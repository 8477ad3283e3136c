//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! service billing test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built dates, months, clients and catalog entries
//! - `builders`: Builder for service assignments with sensible defaults
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use generators::*;
