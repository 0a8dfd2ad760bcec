//! Error handlers
//!
//! Provides error reporting helpers.

use log::{error, warn};

use crate::error::types::AuthError;

/// Log an error from any credential store component
pub fn log_error(err: &dyn std::error::Error) {
    error!("Credential store error: {}", err);
}

/// Log an authentication error at a level matching its severity
pub fn log_auth_error(err: &AuthError) {
    match err {
        AuthError::LockedAccount { .. } | AuthError::Validation(_) => {
            warn!("Authentication rejected: {}", err)
        }
        AuthError::Config(_) | AuthError::Hashing(_) => log_error(err),
    }
}
