//! Utilities
//!
//! Application error types and logging setup.

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult, ok};
