// ABOUTME: Request field validation shared by resource services, run before any write
// ABOUTME: Checks required names, HH:MM time-of-day strings and non-negative numeric fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::time_of_day::PATTERN;
use crate::errors::{AppError, AppResult};

static TIME_OF_DAY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(PATTERN).ok());

/// Reject empty or whitespace-only required text
///
/// # Errors
///
/// Returns `InvalidInput` when `value` is blank
pub fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_input(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Like [`require_non_empty`] for fields that are optional in a partial update
///
/// # Errors
///
/// Returns `InvalidInput` when `value` is present but blank
pub fn require_non_empty_if_present(field: &str, value: Option<&str>) -> AppResult<()> {
    value.map_or(Ok(()), |v| require_non_empty(field, v))
}

/// Whether `value` is a 24h `HH:MM` (or `H:MM`) time of day
#[must_use]
pub fn is_time_of_day(value: &str) -> bool {
    TIME_OF_DAY.as_ref().is_some_and(|re| re.is_match(value))
}

/// Validate a 24h `HH:MM` time of day
///
/// # Errors
///
/// Returns `InvalidFormat` (400) when `value` does not match
pub fn validate_time_of_day(field: &str, value: &str) -> AppResult<()> {
    if is_time_of_day(value) {
        Ok(())
    } else {
        Err(AppError::invalid_format(format!(
            "{field} must be a time in HH:MM format, got '{value}'"
        )))
    }
}

/// Validate an optional time of day
///
/// # Errors
///
/// Returns `InvalidFormat` when `value` is present and malformed
pub fn validate_optional_time_of_day(field: &str, value: Option<&str>) -> AppResult<()> {
    value.map_or(Ok(()), |v| validate_time_of_day(field, v))
}

/// Validate an integer that must be at least `min`
///
/// # Errors
///
/// Returns `InvalidInput` when `value < min`
pub fn require_at_least(field: &str, value: i64, min: i64) -> AppResult<()> {
    if value < min {
        return Err(AppError::invalid_input(format!(
            "{field} must be at least {min}, got {value}"
        )));
    }
    Ok(())
}

/// Validate a finite, strictly positive quantity
///
/// # Errors
///
/// Returns `InvalidInput` when `value` is not a positive number
pub fn require_positive(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

/// Validate a finite, non-negative amount
///
/// # Errors
///
/// Returns `InvalidInput` when `value` is negative or not a number
pub fn require_non_negative(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::invalid_input(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_time_of_day_accepts_24h_values() {
        for value in ["00:00", "9:30", "09:30", "19:05", "23:59"] {
            assert!(is_time_of_day(value), "{value} should be valid");
        }
    }

    #[test]
    fn test_time_of_day_rejects_malformed_values() {
        for value in ["24:00", "12:60", "12:5", "noon", "", "12:30:00", " 12:30"] {
            assert!(!is_time_of_day(value), "{value} should be invalid");
        }
    }

    #[test]
    fn test_invalid_time_is_bad_request() {
        let err = validate_time_of_day("startTime", "25:00").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.http_status(), 400);
        assert!(validate_optional_time_of_day("endTime", None).is_ok());
    }

    #[test]
    fn test_required_and_numeric_checks() {
        assert!(require_non_empty("name", "  ").is_err());
        assert!(require_non_empty("name", "Bun").is_ok());
        assert!(require_non_empty_if_present("name", None).is_ok());
        assert!(require_at_least("recipeServings", 0, 1).is_err());
        assert!(require_at_least("recipePrepTime", 0, 0).is_ok());
        assert!(require_positive("ingredientUnits", 0.0).is_err());
        assert!(require_positive("ingredientUnits", 0.5).is_ok());
        assert!(require_non_negative("price", -1.0).is_err());
        assert!(require_non_negative("price", f64::NAN).is_err());
    }
}
