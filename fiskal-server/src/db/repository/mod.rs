//! Repository Module
//!
//! Typed access to the embedded SurrealDB tables. The chain and the audit
//! logs expose append/query only; there is no update or delete surface.

pub mod chain_entry;
pub mod error_log;
pub mod fiscal_config;
pub mod transaction;
pub mod transmission_log;
pub mod z_report;

// Re-exports
pub use chain_entry::ChainEntryRepository;
pub use error_log::ErrorLogRepository;
pub use fiscal_config::FiscalConfigRepository;
pub use transaction::TransactionRepository;
pub use transmission_log::TransmissionLogRepository;
pub use z_report::ZReportRepository;

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

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations come back as a plain database error string
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => shared::AppError::not_found(msg),
            RepoError::Duplicate(msg) => shared::AppError::conflict(msg),
            RepoError::Validation(msg) => shared::AppError::validation(msg),
            RepoError::Database(msg) => shared::AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
