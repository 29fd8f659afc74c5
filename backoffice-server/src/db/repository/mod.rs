//! Repository Module
//!
//! Function-style CRUD over the SQLite pool, one module per table. All
//! queries are runtime-bound; JSON columns are serialized at the call site
//! and decoded through `sqlx(json)` on the models.

pub mod clocking;
pub mod employee;
pub mod incident;
pub mod invoice;
pub mod order;
pub mod product;
pub mod settings;
pub mod sync_log;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
