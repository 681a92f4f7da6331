//! Mapping of server failures to user-facing form messages

use crate::domain::error::ApiError;

use super::field::EntityKind;

pub const USER_LIMIT_MESSAGE: &str =
    "This account has reached its user limit. Deactivate a user or upgrade the membership to add more.";
pub const DUPLICATE_USERNAME_MESSAGE: &str = "That username is already taken.";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "That email address is already registered.";
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";

/// Known server messages, matched case-insensitively; every needle must appear
const KNOWN_MESSAGES: &[(&[&str], &str)] = &[
    (&["user limit"], USER_LIMIT_MESSAGE),
    (&["username", "exists"], DUPLICATE_USERNAME_MESSAGE),
    (&["username", "taken"], DUPLICATE_USERNAME_MESSAGE),
    (&["email", "exists"], DUPLICATE_EMAIL_MESSAGE),
    (&["email", "registered"], DUPLICATE_EMAIL_MESSAGE),
];

/// Generic message when nothing more specific is known
pub fn fallback_message(entity: EntityKind) -> String {
    format!("Failed to save {}. Please try again.", entity)
}

/// Translate an API failure into the message shown on the form
pub fn submit_error_message(entity: EntityKind, error: &ApiError) -> String {
    if error.is_network() {
        return UNREACHABLE_MESSAGE.to_string();
    }

    let server_message = error.message.to_lowercase();
    if let Some((_, message)) = KNOWN_MESSAGES
        .iter()
        .find(|(needles, _)| needles.iter().all(|n| server_message.contains(n)))
    {
        return (*message).to_string();
    }

    match error.status {
        401 => SESSION_EXPIRED_MESSAGE.to_string(),
        403 => FORBIDDEN_MESSAGE.to_string(),
        _ => fallback_message(entity),
    }
}
