//! Order Fulfillment
//!
//! The one place that orchestrates more than one adapter per request:
//! stock movement, catalog push, notifications and invoicing hang off the
//! order lifecycle implemented here.

pub mod money;
pub mod workflow;

pub use workflow::{OrderOutcome, SideEffect, change_status, create_order, update_order};
