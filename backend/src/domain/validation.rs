//! Input validation for register edits and manual adjustments.
//!
//! Validation runs before a value ever reaches the edit overlay; a failed
//! input is surfaced at the field and never staged, so nothing invalid can
//! end up in a commit payload.

use anyhow::Result;
use shared::{ValidationError, ValidationResult};

/// Largest value accepted for any register cell.
const MAX_VALUE: f64 = 1_000_000.0;

/// Clean and parse a numeric input string.
///
/// Strips currency symbols, thousands separators and stray spaces before
/// parsing: accepts "1,234.56", "$500", "  42  ". Inputs with European
/// decimal commas are the form layer's job to normalize first.
pub fn clean_and_parse_number(raw: &str) -> Result<f64> {
    let cleaned = raw
        .trim()
        .replace('€', "")
        .replace('$', "")
        .replace(',', "")
        .replace(' ', "");

    cleaned
        .parse::<f64>()
        .map_err(|e| anyhow::anyhow!("Invalid number format: {}", e))
}

/// Validate an amount cell (invoiced value): non-negative, finite, bounded.
pub fn validate_amount_input(raw: &str) -> ValidationResult {
    validate_numeric_input(raw, false)
}

/// Validate a count cell (units, seller counts): additionally integral.
pub fn validate_count_input(raw: &str) -> ValidationResult {
    validate_numeric_input(raw, true)
}

fn validate_numeric_input(raw: &str, require_integer: bool) -> ValidationResult {
    let mut errors = Vec::new();

    if raw.trim().is_empty() {
        errors.push(ValidationError::EmptyValue);
        return ValidationResult {
            is_valid: false,
            errors,
            cleaned_value: None,
        };
    }

    let cleaned_value = match clean_and_parse_number(raw) {
        Ok(value) => {
            if !value.is_finite() || value < 0.0 {
                errors.push(ValidationError::NegativeValue);
                None
            } else if value > MAX_VALUE {
                errors.push(ValidationError::ValueTooLarge);
                None
            } else if require_integer && value.fract() != 0.0 {
                errors.push(ValidationError::NotAnInteger);
                None
            } else {
                Some(value)
            }
        }
        Err(parse_error) => {
            errors.push(ValidationError::InvalidNumber(parse_error.to_string()));
            None
        }
    };

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        cleaned_value,
    }
}

/// Get a human-readable message for a validation error.
pub fn validation_error_message(error: &ValidationError) -> String {
    match error {
        ValidationError::EmptyValue => "Please enter a value".to_string(),
        ValidationError::InvalidNumber(msg) => {
            format!("Please enter a valid number (like 5 or 5.00): {}", msg)
        }
        ValidationError::NegativeValue => "Value cannot be negative".to_string(),
        ValidationError::AmountNotPositive => "Amount must be greater than 0".to_string(),
        ValidationError::NotAnInteger => "Value must be a whole number".to_string(),
        ValidationError::ValueTooLarge => {
            "Value is too large. Maximum is 1,000,000".to_string()
        }
        ValidationError::EmptyPerson => "Please select a person".to_string(),
    }
}
