//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::TenantNotFound | Self::ExportNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::ChainConflict | Self::ReportAlreadyFinalized => {
                StatusCode::CONFLICT
            }

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::PayloadNotCanonical
            | Self::FutureReportDate => StatusCode::BAD_REQUEST,

            // 422 Unprocessable Entity — precondition failures surfaced to tenant admin
            Self::ConfigMissing
            | Self::ConfigIncomplete
            | Self::TenantSuspended
            | Self::ExportEmptyChain => StatusCode::UNPROCESSABLE_ENTITY,

            // 502 Bad Gateway — upstream signer / authority failures
            Self::ProviderUnavailable
            | Self::AuthorityUnreachable
            | Self::SubmissionRejected => StatusCode::BAD_GATEWAY,

            // 504 Gateway Timeout
            Self::SigningTimeout => StatusCode::GATEWAY_TIMEOUT,

            // 501 Not Implemented
            Self::ProviderNotImplemented => StatusCode::NOT_IMPLEMENTED,

            // 500 Internal Server Error
            Self::Unknown
            | Self::ChainBroken
            | Self::SigningFailed
            | Self::InternalError
            | Self::DatabaseError
            | Self::IoError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
