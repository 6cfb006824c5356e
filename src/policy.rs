//! Password strength policy.
//!
//! One rule, applied everywhere a password enters the system: self-service
//! change, admin reset, interactive user creation, and bulk import.

use crate::constants::password::{MAX_LEN, MIN_LEN};

/// Returns true when the candidate satisfies the strength rule:
/// length in [8, 12] with at least one digit, one uppercase and one
/// lowercase letter.
#[must_use]
pub fn is_strong(candidate: &str) -> bool {
    strength_error(candidate).is_none()
}

/// Returns the first requirement the candidate fails, or `None` when it
/// passes. Checks run in a fixed order so callers get stable messages.
#[must_use]
pub fn strength_error(candidate: &str) -> Option<&'static str> {
    if candidate.is_empty() {
        return Some("Password is required");
    }

    let len = candidate.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Some("Password must be between 8 and 12 characters");
    }

    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number");
    }

    if !candidate.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter");
    }

    if !candidate.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter");
    }

    None
}
