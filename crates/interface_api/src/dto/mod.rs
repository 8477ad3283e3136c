//! Request and response bodies

pub mod assignments;
pub mod clients;
pub mod invoices;
pub mod preview;
pub mod services;
