//! Stored user records

use chrono::{DateTime, Utc};
use std::fmt;

use super::results::UserSummary;

/// A registered user as held by the store
#[derive(Clone)]
pub struct UserRecord {
    pub(crate) username: String,
    pub(crate) password_hash: Vec<u8>,
    pub(crate) salt: Vec<u8>,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_login: Option<DateTime<Utc>>,
    pub(crate) is_active: bool,
}

impl UserRecord {
    pub(crate) fn new(
        username: String,
        password_hash: Vec<u8>,
        salt: Vec<u8>,
        email: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            password_hash,
            salt,
            email,
            created_at,
            last_login: None,
            is_active: true,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            email: self.email.clone(),
            last_login: self.last_login,
        }
    }
}

// Hash and salt stay out of logs.
impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("salt", &"<redacted>")
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("last_login", &self.last_login)
            .field("is_active", &self.is_active)
            .finish()
    }
}
