//! Lunares Back Office Server
//!
//! Backend for the shop dashboard: employee clockings, incident logging,
//! product/stock management, custom-order ("encargo") tracking and invoicing.
//!
//! # Module structure
//!
//! ```text
//! backoffice-server/src/
//! ├── core/        # Config, state, HTTP server
//! ├── api/         # Routes and handlers
//! ├── db/          # SQLite pool and repositories
//! ├── catalog/     # External catalog sync (pull/reconcile/push + images)
//! ├── notify/      # Messaging adapter (phone normalization, templates)
//! ├── invoicing/   # External invoicing adapter (create/pay/pdf)
//! ├── orders/      # Order fulfillment workflow
//! └── utils/       # Errors, logging
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod invoicing;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use orders::{OrderOutcome, SideEffect};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __
   / /   __  ______  ____ _________  _____
  / /   / / / / __ \/ __ `/ ___/ _ \/ ___/
 / /___/ /_/ / / / / /_/ / /  /  __(__  )
/_____/\__,_/_/ /_/\__,_/_/   \___/____/
    back office
    "#
    );
}
