//! Authentication system
//!
//! Handles credential storage, password hashing and failed-login lockout.

pub mod credentials;
pub mod hasher;
pub mod lockout;
pub mod results;
pub mod store;
pub mod validator;

pub use credentials::UserRecord;
pub use lockout::{AttemptTracker, FailedAttemptRecord};
pub use results::UserSummary;
pub use store::CredentialStore;
