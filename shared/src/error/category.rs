//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Fiscal configuration errors
/// - 2xxx: Chain errors
/// - 3xxx: Signing errors
/// - 4xxx: Daily closing errors
/// - 5xxx: Export errors
/// - 6xxx: Submission errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Fiscal configuration errors (1xxx)
    Config,
    /// Chain errors (2xxx)
    Chain,
    /// Signing errors (3xxx)
    Signing,
    /// Daily closing errors (4xxx)
    Closing,
    /// Export errors (5xxx)
    Export,
    /// Submission errors (6xxx)
    Submission,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Config,
            2000..3000 => Self::Chain,
            3000..4000 => Self::Signing,
            4000..5000 => Self::Closing,
            5000..6000 => Self::Export,
            6000..7000 => Self::Submission,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Config => "config",
            Self::Chain => "chain",
            Self::Signing => "signing",
            Self::Closing => "closing",
            Self::Export => "export",
            Self::Submission => "submission",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Config);
        assert_eq!(ErrorCategory::from_code(2002), ErrorCategory::Chain);
        assert_eq!(ErrorCategory::from_code(3002), ErrorCategory::Signing);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Closing);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Export);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Submission);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::ConfigMissing.category(), ErrorCategory::Config);
        assert_eq!(ErrorCode::ChainBroken.category(), ErrorCategory::Chain);
        assert_eq!(
            ErrorCode::ProviderUnavailable.category(),
            ErrorCategory::Signing
        );
        assert_eq!(
            ErrorCode::ReportAlreadyFinalized.category(),
            ErrorCategory::Closing
        );
        assert_eq!(ErrorCode::ExportNotFound.category(), ErrorCategory::Export);
        assert_eq!(
            ErrorCode::SubmissionRejected.category(),
            ErrorCategory::Submission
        );
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Signing).unwrap();
        assert_eq!(json, "\"signing\"");
    }
}
