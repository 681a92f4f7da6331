//! Field checks shared by the user and account forms

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors produced by the shared field checks
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please confirm deletion and provide a reason")]
    DeletionNotConfirmed,
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Validate an email address
///
/// Accepts the `local@domain.tld` shape; no whitespace, exactly one `@`.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidEmail)
    }
}

/// Validate a password length (counted in characters)
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), UserValidationError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(UserValidationError::PasswordMismatch)
    }
}

/// A permanent deletion needs an explicit confirmation and a reason
pub fn validate_permanent_deletion(
    confirmed: bool,
    reason: &str,
) -> Result<(), UserValidationError> {
    if !confirmed || reason.trim().is_empty() {
        return Err(UserValidationError::DeletionNotConfirmed);
    }

    Ok(())
}
