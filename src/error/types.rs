//! Error types
//!
//! Defines the error taxonomy for credential store operations and configuration.
//! Expected negative outcomes (duplicate username, wrong password, unknown or
//! inactive user) are not errors; they come back as `Ok(false)` / `Ok(None)`.

use thiserror::Error;

/// Credential store errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Password too short, or a malformed username
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Authentication attempted while the account is locked out
    #[error("Account {username} is locked, retry in {retry_after_secs}s")]
    LockedAccount {
        username: String,
        retry_after_secs: u64,
    },

    /// Store built from a configuration that failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key derivation failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<argon2::Error> for AuthError {
    fn from(error: argon2::Error) -> Self {
        AuthError::Hashing(error.to_string())
    }
}

impl From<ConfigError> for AuthError {
    fn from(error: ConfigError) -> Self {
        AuthError::Config(error.to_string())
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
