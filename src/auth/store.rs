//! In-memory credential store
//!
//! Owns user records and failed-attempt counters. All state lives in process
//! memory and is gone when the store is dropped.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::credentials::UserRecord;
use super::hasher::PasswordHasher;
use super::lockout::AttemptTracker;
use super::results::UserSummary;
use super::validator::{validate_password, validate_username};
use crate::clock::{Clock, SystemClock};
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Credential store with login throttling
pub struct CredentialStore {
    users: HashMap<String, UserRecord>,
    attempts: AttemptTracker,
    hasher: PasswordHasher,
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl CredentialStore {
    /// Create an empty store reading real system time
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AuthConfig, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        config.validate()?;

        let hasher = PasswordHasher::new(&config)?;
        let attempts = AttemptTracker::new(config.max_attempts, config.lockout_duration());

        Ok(Self {
            users: HashMap::new(),
            attempts,
            hasher,
            config,
            clock,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a new user.
    ///
    /// Returns `Ok(false)` if the username is taken.
    pub fn register(&mut self, username: &str, password: &str, email: &str) -> Result<bool, AuthError> {
        validate_username(username, self.config.max_input_length)?;

        if self.users.contains_key(username) {
            return Ok(false);
        }

        validate_password(password, self.config.min_password_length)?;

        let salt = self.hasher.new_salt();
        let password_hash = self.hasher.hash(password, &salt)?;

        let record = UserRecord::new(
            username.to_string(),
            password_hash,
            salt,
            email.to_string(),
            self.clock.now(),
        );
        self.users.insert(username.to_string(), record);

        info!("Registered user {}", username);
        Ok(true)
    }

    /// Check a username/password pair.
    ///
    /// Fails with [`AuthError::LockedAccount`] while the account is locked out,
    /// even if the password is correct. Unknown, inactive and wrong-password
    /// logins all come back as `Ok(None)`. A username that could never have
    /// been registered is `Ok(None)` too, and leaves no failure record.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<Option<UserSummary>, AuthError> {
        if validate_username(username, self.config.max_input_length).is_err() {
            return Ok(None);
        }

        let now = self.clock.now();

        if let Some(remaining) = self.attempts.lockout_remaining(username, now) {
            warn!("Login refused for locked account {}", username);
            return Err(AuthError::LockedAccount {
                username: username.to_string(),
                retry_after_secs: remaining.num_seconds().max(0) as u64
                    + u64::from(remaining.subsec_nanos() > 0),
            });
        }

        let Some(user) = self.users.get_mut(username) else {
            if self.config.track_unknown_users {
                let count = self.attempts.record_failure(username, now);
                warn!("Login failed for unknown user {} ({} consecutive)", username, count);
            }
            return Ok(None);
        };

        if !user.is_active {
            info!("Login refused for inactive user {}", username);
            return Ok(None);
        }

        if !self.hasher.verify(password, &user.salt, &user.password_hash)? {
            let count = self.attempts.record_failure(username, now);
            warn!("Wrong password for {} ({} consecutive)", username, count);
            return Ok(None);
        }

        user.last_login = Some(now);
        self.attempts.reset(username);

        info!("User {} logged in", username);
        Ok(Some(user.summary()))
    }

    /// Replace a user's password after re-checking the old one.
    ///
    /// The re-check goes through [`CredentialStore::authenticate`], so it counts
    /// toward lockout and refreshes `last_login` on success.
    pub fn change_password(
        &mut self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, AuthError> {
        if self.authenticate(username, old_password)?.is_none() {
            return Ok(false);
        }

        validate_password(new_password, self.config.min_password_length)?;

        let salt = self.hasher.new_salt();
        let password_hash = self.hasher.hash(new_password, &salt)?;

        let Some(user) = self.users.get_mut(username) else {
            return Ok(false);
        };
        user.salt = salt;
        user.password_hash = password_hash;

        info!("Password changed for {}", username);
        Ok(true)
    }

    /// Mark a user inactive. Returns `false` for unknown usernames.
    pub fn deactivate(&mut self, username: &str) -> bool {
        match self.users.get_mut(username) {
            Some(user) => {
                user.is_active = false;
                info!("Deactivated user {}", username);
                true
            }
            None => false,
        }
    }

    pub fn is_locked(&self, username: &str) -> bool {
        self.attempts.is_locked(username, self.clock.now())
    }

    /// Consecutive failures still inside the window, 0 when none.
    pub fn failed_attempts(&self, username: &str) -> u32 {
        self.attempts.count(username, self.clock.now())
    }

    /// Drop failure records whose window has passed
    pub fn purge_expired_attempts(&mut self) -> usize {
        self.attempts.prune(self.clock.now())
    }

    /// Number of usernames with a failure record held
    pub fn tracked_attempts(&self) -> usize {
        self.attempts.len()
    }

    pub fn last_failed_attempt(&self, username: &str) -> Option<DateTime<Utc>> {
        self.attempts.get(username).map(|r| r.last_attempt)
    }

    pub fn summary(&self, username: &str) -> Option<UserSummary> {
        self.users.get(username).map(UserRecord::summary)
    }

    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeDelta;

    fn test_config() -> AuthConfig {
        AuthConfig {
            hash_memory_kib: 8,
            hash_iterations: 1,
            ..AuthConfig::default()
        }
    }

    fn store_with_clock() -> (CredentialStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let store = CredentialStore::with_clock(test_config(), clock.clone()).unwrap();
        (store, clock)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AuthConfig {
            max_attempts: 0,
            ..test_config()
        };
        assert!(matches!(
            CredentialStore::new(config),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_register_twice() {
        let (mut store, _) = store_with_clock();
        assert_eq!(store.register("alice", "password123", "a@example.com"), Ok(true));
        assert_eq!(store.register("alice", "different99", "b@example.com"), Ok(false));
        assert_eq!(store.len(), 1);
        assert_eq!(store.summary("alice").unwrap().email, "a@example.com");
    }

    #[test]
    fn test_register_short_password() {
        let (mut store, _) = store_with_clock();
        assert!(matches!(
            store.register("alice", "short", "a@example.com"),
            Err(AuthError::Validation(_))
        ));
        assert!(!store.contains("alice"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_register_bad_username() {
        let (mut store, _) = store_with_clock();
        assert!(matches!(
            store.register("", "password123", "a@example.com"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            store.register("bad\nname", "password123", "a@example.com"),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_created_at_uses_clock() {
        let (mut store, clock) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        assert_eq!(store.user("alice").unwrap().created_at(), clock.now());
    }

    #[test]
    fn test_authenticate_success_sets_last_login() {
        let (mut store, clock) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        clock.advance(TimeDelta::seconds(5));

        let summary = store.authenticate("alice", "password123").unwrap().unwrap();
        assert_eq!(summary.username, "alice");
        assert_eq!(summary.email, "a@example.com");
        assert_eq!(summary.last_login, Some(clock.now()));
    }

    #[test]
    fn test_wrong_password_counts() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        assert_eq!(store.authenticate("alice", "wrong-pass"), Ok(None));
        assert_eq!(store.failed_attempts("alice"), 1);
        assert!(store.user("alice").unwrap().last_login().is_none());
    }

    #[test]
    fn test_locks_after_max_attempts() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        for _ in 0..3 {
            assert_eq!(store.authenticate("alice", "wrong-pass"), Ok(None));
        }
        assert!(store.is_locked("alice"));

        let err = store.authenticate("alice", "password123").unwrap_err();
        assert_eq!(
            err,
            AuthError::LockedAccount {
                username: "alice".into(),
                retry_after_secs: 300,
            }
        );
        // Locked attempts are not counted
        assert_eq!(store.failed_attempts("alice"), 3);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let (mut store, clock) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        for _ in 0..3 {
            store.authenticate("alice", "wrong-pass").unwrap();
        }
        clock.advance(TimeDelta::milliseconds(100_500));
        match store.authenticate("alice", "password123") {
            Err(AuthError::LockedAccount { retry_after_secs, .. }) => {
                assert_eq!(retry_after_secs, 200)
            }
            other => panic!("expected lockout, got {other:?}"),
        }
    }

    #[test]
    fn test_lockout_expires() {
        let (mut store, clock) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        for _ in 0..3 {
            store.authenticate("alice", "wrong-pass").unwrap();
        }
        clock.advance(TimeDelta::seconds(301));
        assert!(!store.is_locked("alice"));

        assert_eq!(store.authenticate("alice", "wrong-pass"), Ok(None));
        assert_eq!(store.failed_attempts("alice"), 1);

        assert!(store.authenticate("alice", "password123").unwrap().is_some());
        assert_eq!(store.failed_attempts("alice"), 0);
    }

    #[test]
    fn test_success_clears_failures() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        store.authenticate("alice", "wrong-pass").unwrap();
        store.authenticate("alice", "wrong-pass").unwrap();
        assert_eq!(store.failed_attempts("alice"), 2);

        assert!(store.authenticate("alice", "password123").unwrap().is_some());
        assert_eq!(store.failed_attempts("alice"), 0);
        assert!(store.last_failed_attempt("alice").is_none());
    }

    #[test]
    fn test_unknown_user_is_tracked() {
        let (mut store, _) = store_with_clock();
        for _ in 0..3 {
            assert_eq!(store.authenticate("ghost", "password123"), Ok(None));
        }
        assert!(matches!(
            store.authenticate("ghost", "password123"),
            Err(AuthError::LockedAccount { .. })
        ));
    }

    #[test]
    fn test_unknown_user_tracking_can_be_disabled() {
        let clock = Arc::new(ManualClock::default());
        let config = AuthConfig {
            track_unknown_users: false,
            ..test_config()
        };
        let mut store = CredentialStore::with_clock(config, clock).unwrap();
        for _ in 0..5 {
            assert_eq!(store.authenticate("ghost", "password123"), Ok(None));
        }
        assert_eq!(store.failed_attempts("ghost"), 0);
    }

    #[test]
    fn test_inactive_user_is_not_counted() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        assert!(store.deactivate("alice"));
        assert_eq!(store.authenticate("alice", "password123"), Ok(None));
        assert_eq!(store.failed_attempts("alice"), 0);
    }

    #[test]
    fn test_deactivate_unknown() {
        let (mut store, _) = store_with_clock();
        assert!(!store.deactivate("nobody"));
    }

    #[test]
    fn test_change_password() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        let old_hash = store.user("alice").unwrap().password_hash.clone();

        assert_eq!(store.change_password("alice", "wrong-pass", "newpassword1"), Ok(false));
        assert_eq!(store.user("alice").unwrap().password_hash, old_hash);

        assert_eq!(store.change_password("alice", "password123", "newpassword1"), Ok(true));
        assert_ne!(store.user("alice").unwrap().password_hash, old_hash);
        assert_eq!(store.authenticate("alice", "password123"), Ok(None));
        assert!(store.authenticate("alice", "newpassword1").unwrap().is_some());
    }

    #[test]
    fn test_change_password_too_short() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        assert!(matches!(
            store.change_password("alice", "password123", "short"),
            Err(AuthError::Validation(_))
        ));
        assert!(store.authenticate("alice", "password123").unwrap().is_some());
    }

    #[test]
    fn test_change_password_while_locked() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        for _ in 0..3 {
            store.authenticate("alice", "wrong-pass").unwrap();
        }
        assert!(matches!(
            store.change_password("alice", "password123", "newpassword1"),
            Err(AuthError::LockedAccount { .. })
        ));
    }

    #[test]
    fn test_same_password_different_salts() {
        let (mut store, _) = store_with_clock();
        store.register("alice", "password123", "a@example.com").unwrap();
        store.register("bob", "password123", "b@example.com").unwrap();
        let alice = store.user("alice").unwrap();
        let bob = store.user("bob").unwrap();
        assert_ne!(alice.salt, bob.salt);
        assert_ne!(alice.password_hash, bob.password_hash);
        assert_ne!(alice.password_hash, b"password123".to_vec());
    }

    #[test]
    fn test_oversized_username_is_not_tracked() {
        let (mut store, _) = store_with_clock();
        let huge = "x".repeat(store.config().max_input_length + 1);
        assert_eq!(store.authenticate(&huge, "password123"), Ok(None));
        assert_eq!(store.authenticate("bad\0name", "password123"), Ok(None));
        assert_eq!(store.tracked_attempts(), 0);
        assert_eq!(store.failed_attempts(&huge), 0);
    }

    #[test]
    fn test_expired_ghost_records_are_dropped() {
        let (mut store, clock) = store_with_clock();
        for i in 0..1000 {
            store.authenticate(&format!("ghost{i}"), "password123").unwrap();
        }
        assert_eq!(store.tracked_attempts(), 1000);

        clock.advance(TimeDelta::days(365));
        assert_eq!(store.failed_attempts("ghost0"), 0);

        store.authenticate("ghost-new", "password123").unwrap();
        assert_eq!(store.tracked_attempts(), 1);
    }

    #[test]
    fn test_purge_expired_attempts() {
        let (mut store, clock) = store_with_clock();
        store.authenticate("ghost", "password123").unwrap();
        clock.advance(TimeDelta::seconds(200));
        store.authenticate("ghost-2", "password123").unwrap();

        clock.advance(TimeDelta::seconds(150));
        assert_eq!(store.purge_expired_attempts(), 1);
        assert_eq!(store.tracked_attempts(), 1);
        assert_eq!(store.failed_attempts("ghost-2"), 1);
    }
}
