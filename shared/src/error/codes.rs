//! Unified error codes for the operations backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Billing errors (payment cycle, ledger)
//! - 5xxx: Report errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript).
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

    // ==================== 4xxx: Billing ====================
    /// Payment cycle has no rollover implementation
    UnsupportedCycle = 4001,
    /// Payment targets a period later than the current one
    FuturePeriod = 4002,
    /// Payment targets a period before the entity's onboarding
    PeriodBeforeOnboarding = 4003,
    /// Period is already settled (paid or early paid)
    PeriodAlreadySettled = 4004,

    // ==================== 5xxx: Report ====================
    /// Month/year pair is not a valid period
    InvalidPeriod = 5001,
    /// Unknown report kind
    UnknownReportKind = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric value of this error code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::UnsupportedCycle => "Payment cycle is not supported",
            Self::FuturePeriod => "Cannot process a payment for a future period",
            Self::PeriodBeforeOnboarding => "Period precedes the entity's onboarding date",
            Self::PeriodAlreadySettled => "Period is already settled",

            Self::InvalidPeriod => "Invalid report period",
            Self::UnknownReportKind => "Unknown report kind",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidPeriod
            | Self::PeriodBeforeOnboarding
            | Self::UnknownReportKind => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::PeriodAlreadySettled => StatusCode::CONFLICT,
            Self::UnsupportedCycle | Self::FuturePeriod => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the category of this error code
    pub fn category(&self) -> super::ErrorCategory {
        super::ErrorCategory::from_code(self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
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
            4001 => Self::UnsupportedCycle,
            4002 => Self::FuturePeriod,
            4003 => Self::PeriodBeforeOnboarding,
            4004 => Self::PeriodAlreadySettled,
            5001 => Self::InvalidPeriod,
            5002 => Self::UnknownReportKind,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
