//! Input validation helpers
//!
//! Centralized text/amount limits and validation functions used by the
//! CRUD handlers. Amount bounds guard against NaN/Infinity reaching the
//! decimal arithmetic.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Entity names: client, employee, finance category, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, remarks, reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, payment method, designation
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum allowed monetary amount per record
pub const MAX_AMOUNT: f64 = 10_000_000.0;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a nominal payment day (1-31; clamping to shorter months
/// happens later in the cycle engine).
pub fn validate_payment_day(day: u32) -> Result<(), AppError> {
    if !(1..=31).contains(&day) {
        return Err(AppError::validation(format!(
            "payment_day must be between 1 and 31, got {day}"
        )));
    }
    Ok(())
}

/// Validate a monetary amount: finite, non-negative, bounded.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate an optional monetary amount.
pub fn validate_optional_amount(value: Option<f64>, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) => validate_amount(v, field),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Acme", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_payment_day_bounds() {
        assert!(validate_payment_day(1).is_ok());
        assert!(validate_payment_day(31).is_ok());
        assert!(validate_payment_day(0).is_err());
        assert!(validate_payment_day(32).is_err());
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_amount(0.0, "amount").is_ok());
        assert!(validate_amount(1500.55, "amount").is_ok());
        assert!(validate_amount(-1.0, "amount").is_err());
        assert!(validate_amount(f64::NAN, "amount").is_err());
        assert!(validate_amount(f64::INFINITY, "amount").is_err());
        assert!(validate_amount(MAX_AMOUNT + 1.0, "amount").is_err());
    }
}
