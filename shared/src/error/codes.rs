//! Unified error codes for the Fiskal ledger
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Fiscal configuration errors
//! - 2xxx: Chain errors
//! - 3xxx: Signing errors
//! - 4xxx: Daily closing errors
//! - 5xxx: Export errors
//! - 6xxx: Submission errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Fiscal configuration ====================
    /// Tenant fiscal configuration not found
    ConfigMissing = 1001,
    /// Configuration exists but lacks required fields (key material, credentials)
    ConfigIncomplete = 1002,
    /// Tenant not found
    TenantNotFound = 1003,
    /// Tenant is suspended
    TenantSuspended = 1004,

    // ==================== 2xxx: Chain ====================
    /// Concurrent append conflict detected
    ChainConflict = 2001,
    /// Chain integrity verification found a break
    ChainBroken = 2002,
    /// Payload could not be canonicalized
    PayloadNotCanonical = 2003,

    // ==================== 3xxx: Signing ====================
    /// Signature computation failed
    SigningFailed = 3001,
    /// Remote signing provider returned an error or is unreachable
    ProviderUnavailable = 3002,
    /// Signing provider declared but not wired
    ProviderNotImplemented = 3003,
    /// Signing call exceeded its deadline
    SigningTimeout = 3004,

    // ==================== 4xxx: Daily closing ====================
    /// A finalized Z-report already exists for this date
    ReportAlreadyFinalized = 4001,
    /// Closing requested for a future date
    FutureReportDate = 4002,

    // ==================== 5xxx: Export ====================
    /// No stored export document for the requested date
    ExportNotFound = 5001,
    /// Export requested for a tenant with an empty chain
    ExportEmptyChain = 5002,

    // ==================== 6xxx: Submission ====================
    /// Authority rejected the submission
    SubmissionRejected = 6001,
    /// Authority endpoint unreachable
    AuthorityUnreachable = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Filesystem I/O error
    IoError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",

            Self::ConfigMissing => "Fiscal configuration missing",
            Self::ConfigIncomplete => "Fiscal configuration incomplete",
            Self::TenantNotFound => "Tenant not found",
            Self::TenantSuspended => "Tenant is suspended",

            Self::ChainConflict => "Chain append conflict",
            Self::ChainBroken => "Chain integrity broken",
            Self::PayloadNotCanonical => "Payload cannot be canonicalized",

            Self::SigningFailed => "Signature computation failed",
            Self::ProviderUnavailable => "Signing provider unavailable",
            Self::ProviderNotImplemented => "Signing provider not implemented",
            Self::SigningTimeout => "Signing call timed out",

            Self::ReportAlreadyFinalized => "Z-report already finalized for this date",
            Self::FutureReportDate => "Cannot close a future date",

            Self::ExportNotFound => "Export document not found",
            Self::ExportEmptyChain => "Chain is empty, nothing to export",

            Self::SubmissionRejected => "Authority rejected the submission",
            Self::AuthorityUnreachable => "Authority endpoint unreachable",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::IoError => "Filesystem I/O error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,

            1001 => Self::ConfigMissing,
            1002 => Self::ConfigIncomplete,
            1003 => Self::TenantNotFound,
            1004 => Self::TenantSuspended,

            2001 => Self::ChainConflict,
            2002 => Self::ChainBroken,
            2003 => Self::PayloadNotCanonical,

            3001 => Self::SigningFailed,
            3002 => Self::ProviderUnavailable,
            3003 => Self::ProviderNotImplemented,
            3004 => Self::SigningTimeout,

            4001 => Self::ReportAlreadyFinalized,
            4002 => Self::FutureReportDate,

            5001 => Self::ExportNotFound,
            5002 => Self::ExportEmptyChain,

            6001 => Self::SubmissionRejected,
            6002 => Self::AuthorityUnreachable,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::IoError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
