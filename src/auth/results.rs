//! Authentication result types
//!
//! Defines result structures returned by authentication operations.

use chrono::{DateTime, Utc};

/// Non-sensitive view of a user, returned on successful authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    pub last_login: Option<DateTime<Utc>>,
}
