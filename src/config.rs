//! Configuration management for the credential store
//!
//! Policy values are read from `config.toml` with `CRED_STORE_` environment
//! overrides. Missing keys fall back to the defaults below.

use chrono::TimeDelta;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;

/// Argon2 refuses salts shorter than this.
pub const MIN_SALT_LENGTH: usize = 8;

/// Lockout, validation and hashing policy for a credential store
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    // ═══ LOCKOUT ═══
    /// Consecutive failures inside the window before the account locks
    /// Environment: CRED_STORE_MAX_ATTEMPTS
    pub max_attempts: u32,

    /// Length of the lockout window in seconds
    /// Environment: CRED_STORE_LOCKOUT_DURATION_SECS
    pub lockout_duration_secs: u64,

    /// Whether failures against unknown usernames are counted too
    pub track_unknown_users: bool,

    // ═══ INPUT VALIDATION ═══
    /// Shortest accepted password, in characters
    pub min_password_length: usize,

    /// Longest accepted username, in bytes
    pub max_input_length: usize,

    // ═══ HASHING ═══
    /// Random salt length in bytes
    pub salt_length: usize,

    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,

    /// Argon2 time cost (passes over memory)
    pub hash_iterations: u32,

    /// Argon2 lanes
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lockout_duration_secs: 300,
            track_unknown_users: true,
            min_password_length: 8,
            max_input_length: 256,
            salt_length: 16,
            hash_memory_kib: 19 * 1024,
            hash_iterations: 2,
            hash_parallelism: 1,
        }
    }
}

impl AuthConfig {
    /// Load configuration: defaults, then config.toml, then environment overrides.
    ///
    /// Both config file locations are optional; the packaged layout wins over
    /// the working directory when both exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layered(&["config", "credential-store/config"])
    }

    /// Load configuration from a single file path (extension optional).
    ///
    /// A missing file is skipped, so environment overrides still apply.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::load_layered(&[path])
    }

    fn load_layered(paths: &[&str]) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        for path in paths {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        // Keys are flat, so no nesting separator: CRED_STORE_MAX_ATTEMPTS -> max_attempts
        let settings = builder
            .add_source(Environment::with_prefix("CRED_STORE").try_parsing(true))
            .build()?;

        let config: AuthConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts must be greater than 0".into(),
            ));
        }

        if self.lockout_duration_secs == 0 {
            return Err(ConfigError::Invalid(
                "lockout_duration_secs must be greater than 0".into(),
            ));
        }

        let secs = i64::try_from(self.lockout_duration_secs).unwrap_or(i64::MAX);
        if TimeDelta::try_seconds(secs).is_none() {
            return Err(ConfigError::Invalid("lockout_duration_secs is too large".into()));
        }

        if self.min_password_length == 0 {
            return Err(ConfigError::Invalid(
                "min_password_length must be greater than 0".into(),
            ));
        }

        if self.max_input_length == 0 {
            return Err(ConfigError::Invalid(
                "max_input_length must be greater than 0".into(),
            ));
        }

        if self.salt_length < MIN_SALT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "salt_length must be at least {MIN_SALT_LENGTH} bytes"
            )));
        }

        if self.hash_parallelism == 0 || self.hash_iterations == 0 {
            return Err(ConfigError::Invalid(
                "hash_iterations and hash_parallelism must be greater than 0".into(),
            ));
        }

        if self.hash_memory_kib < self.hash_parallelism.saturating_mul(8) {
            return Err(ConfigError::Invalid(
                "hash_memory_kib must be at least 8 KiB per lane".into(),
            ));
        }

        Ok(())
    }

    /// Get the lockout window as a duration, saturating at `TimeDelta::MAX`
    pub fn lockout_duration(&self) -> TimeDelta {
        i64::try_from(self.lockout_duration_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}
