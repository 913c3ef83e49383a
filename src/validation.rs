//! Field rules for registration and inventory payloads.
//!
//! Each rule returns the first reason a value is rejected. Rules never
//! aggregate: callers evaluate fields in a fixed order and stop at the first
//! failure.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::Number;
use validator::{ValidationError, ValidationErrors};

pub const USERNAME_MIN_LENGTH: usize = 6;
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const ITEM_NAME_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap()
});

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Turn a single failing rule into [`ValidationErrors`].
pub fn reject(field: &'static str, err: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}

/// At least 6 characters, letters and digits only.
pub fn username(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < USERNAME_MIN_LENGTH {
        return Err(error(
            "length",
            "Username must be at least 6 characters long.",
        ));
    }

    if !value.chars().all(char::is_alphanumeric) {
        return Err(error(
            "alphanumeric",
            "Username must contain only alphanumeric characters.",
        ));
    }

    Ok(())
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a
/// digit.
pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(error(
            "length",
            "Password must be at least 8 characters long.",
        ));
    }

    if !value.chars().any(char::is_uppercase) {
        return Err(error(
            "uppercase",
            "Password must contain at least one uppercase letter.",
        ));
    }

    if !value.chars().any(char::is_lowercase) {
        return Err(error(
            "lowercase",
            "Password must contain at least one lowercase letter.",
        ));
    }

    if !value.chars().any(char::is_numeric) {
        return Err(error("digit", "Password must contain at least one digit."));
    }

    Ok(())
}

/// Syntactic `local@domain.tld` check.
pub fn email(value: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(error("email", "Invalid email address."))
    }
}

/// Required, not blank, at most 100 characters.
pub fn item_name(value: Option<&str>) -> Result<(), ValidationError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Err(error("required", "Item name must be a non-empty string."));
    };

    if value.chars().count() > ITEM_NAME_MAX_LENGTH {
        return Err(error(
            "length",
            "Item name must not exceed 100 characters.",
        ));
    }

    Ok(())
}

/// Optional, at most 500 characters.
pub fn description(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(value) if value.chars().count() > DESCRIPTION_MAX_LENGTH => Err(
            error("length", "Description must not exceed 500 characters."),
        ),
        _ => Ok(()),
    }
}

/// Required non-negative integer.
pub fn quantity(value: Option<&Number>) -> Result<i32, ValidationError> {
    value
        .and_then(Number::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .filter(|n| *n >= 0)
        .ok_or_else(|| {
            error("quantity", "Quantity must be a non-negative integer.")
        })
}

/// Required non-negative number.
pub fn price(value: Option<&Number>) -> Result<f64, ValidationError> {
    value
        .and_then(Number::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| error("price", "Price must be a non-negative number."))
}
