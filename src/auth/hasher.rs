//! Password hashing
//!
//! Derives `H(password, salt)` with Argon2id. The output is raw bytes and is
//! fully determined by the password, the salt and the configured cost.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Derived hash length in bytes.
pub const HASH_LENGTH: usize = 32;

/// Generate `len` bytes of random salt.
pub fn generate_salt(len: usize) -> Vec<u8> {
    let mut salt = vec![0u8; len];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Argon2id hasher configured from an [`AuthConfig`]
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    salt_length: usize,
}

impl PasswordHasher {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            Some(HASH_LENGTH),
        )?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            salt_length: config.salt_length,
        })
    }

    /// Fresh salt of the configured length
    pub fn new_salt(&self) -> Vec<u8> {
        generate_salt(self.salt_length)
    }

    pub fn hash(&self, password: &str, salt: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut out = vec![0u8; HASH_LENGTH];
        self.argon2
            .hash_password_into(password.as_bytes(), salt, &mut out)?;
        Ok(out)
    }

    /// Check a password against a stored hash.
    pub fn verify(&self, password: &str, salt: &[u8], expected: &[u8]) -> Result<bool, AuthError> {
        let candidate = self.hash(password, salt)?;
        Ok(constant_time_eq(&candidate, expected))
    }
}

/// Byte comparison whose running time does not depend on where inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
