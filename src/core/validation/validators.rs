//! Reusable field validators
//!
//! Plugged into `#[validate(custom(function = "..."))]` on request payloads.

use crate::core::location::Coordinates;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// Administrative codes and catalog identifiers: letters, digits, `-` and `_`
static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("code pattern is valid"));

fn failure(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Validator: value is a well-formed code or identifier
pub fn validate_code(value: &str) -> Result<(), ValidationError> {
    if CODE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(failure(
            "code",
            format!("'{}' is not a valid code (expected 1-64 of [A-Za-z0-9_-])", value),
        ))
    }
}

/// Validator: latitude/longitude are finite and within range
pub fn validate_coordinates(value: &Coordinates) -> Result<(), ValidationError> {
    if value.is_valid() {
        Ok(())
    } else {
        Err(failure(
            "coordinates",
            format!(
                "coordinates ({}, {}) are out of range",
                value.latitude, value.longitude
            ),
        ))
    }
}
