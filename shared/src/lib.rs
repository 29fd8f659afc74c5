//! Shared types for the Lunares back office
//!
//! Domain models and DTOs used by the server and by API clients.
//! Database derives are feature-gated behind `db` so clients can depend on
//! the models without pulling in sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
