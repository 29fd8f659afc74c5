//! Invoicing Integration
//!
//! Creates and settles invoice documents on the external accounting
//! platform, mirroring them into the local invoice table. Unlike catalog
//! and messaging, invoicing errors propagate to the caller: a failed
//! invoice during a status transition is something the operator must see.

pub mod client;
pub mod service;

pub use client::{InvoiceError, InvoicingClient};
pub use service::{create_from_order, fetch_pdf, mark_paid};
