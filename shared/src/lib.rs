//! Shared types for the Fiskal ledger
//!
//! Common types used across the workspace: the unified error system
//! (`AppError` / `ErrorCode` / `ApiResponse`) and small utilities.

pub mod error;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
