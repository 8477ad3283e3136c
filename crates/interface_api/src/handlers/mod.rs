//! Request handlers

pub mod assignments;
pub mod clients;
pub mod health;
pub mod invoices;
pub mod preview;
pub mod services;
