//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the error code range:
/// - 0xxx: General errors
/// - 4xxx: Billing errors
/// - 5xxx: Report errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Billing errors (4xxx)
    Billing,
    /// Report errors (5xxx)
    Report,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..4000 => Self::General,
            4000..5000 => Self::Billing,
            5000..6000 => Self::Report,
            _ => Self::System,
        }
    }

    /// Determine category from an [`ErrorCode`]
    pub fn of(code: ErrorCode) -> Self {
        Self::from_code(code.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ranges() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(3), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Billing);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Report);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
    }

    #[test]
    fn test_category_of_code() {
        assert_eq!(
            ErrorCategory::of(ErrorCode::PeriodAlreadySettled),
            ErrorCategory::Billing
        );
        assert_eq!(
            ErrorCategory::of(ErrorCode::DatabaseError),
            ErrorCategory::System
        );
    }
}
