//! Messaging Integration
//!
//! Templated notifications to the configured recipient list through the
//! external messaging API. Sends are best-effort and per-recipient
//! independent.

pub mod client;
pub mod phone;
pub mod service;

pub use client::MessagingClient;
pub use phone::normalize_phone;
pub use service::{NotifyOutcome, SendOutcome, notify, notify_template, render_template};
