//! Input validation
//!
//! Checks usernames and passwords before they reach the store.

use crate::error::AuthError;

/// Performs basic input sanitation to check for malicious or malformed usernames.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Validates the shape of a username.
pub fn validate_username(username: &str, max_length: usize) -> Result<(), AuthError> {
    if is_valid_input(username, max_length) {
        Ok(())
    } else {
        Err(AuthError::Validation("Invalid username format".into()))
    }
}

/// Validates password strength. Length is counted in characters.
pub fn validate_password(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::Validation(format!(
            "Password must be at least {min_length} characters"
        )));
    }
    Ok(())
}
