//! Failed login tracking
//!
//! Counts consecutive failures per username. An account is locked while its
//! count is at the limit and the last failure is still inside the window; the
//! lock is never stored, only computed. Records whose window has passed are
//! swept out at most once per window, so the map only holds recent failures.

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use std::collections::HashMap;

/// Failure bookkeeping for one username
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedAttemptRecord {
    pub count: u32,
    pub last_attempt: DateTime<Utc>,
}

/// Failed attempt tracker with time-decaying lockout
#[derive(Debug)]
pub struct AttemptTracker {
    attempts: HashMap<String, FailedAttemptRecord>,
    max_attempts: u32,
    window: TimeDelta,
    last_sweep: Option<DateTime<Utc>>,
}

impl AttemptTracker {
    pub fn new(max_attempts: u32, window: TimeDelta) -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts,
            window,
            last_sweep: None,
        }
    }

    fn is_expired(&self, record: &FailedAttemptRecord, now: DateTime<Utc>) -> bool {
        now - record.last_attempt > self.window
    }

    /// Time left on the lock, or `None` when the account may attempt a login.
    pub fn lockout_remaining(&self, username: &str, now: DateTime<Utc>) -> Option<TimeDelta> {
        let record = self.attempts.get(username)?;

        if record.count < self.max_attempts {
            return None;
        }

        let elapsed = now - record.last_attempt;
        if elapsed < self.window {
            Some(self.window - elapsed)
        } else {
            None
        }
    }

    pub fn is_locked(&self, username: &str, now: DateTime<Utc>) -> bool {
        self.lockout_remaining(username, now).is_some()
    }

    /// Record a failure and return the new count.
    ///
    /// Once the window since the previous failure has passed, counting starts
    /// again from 1.
    pub fn record_failure(&mut self, username: &str, now: DateTime<Utc>) -> u32 {
        if self.last_sweep.is_none_or(|t| now - t > self.window) {
            self.prune(now);
            self.last_sweep = Some(now);
        }

        let window = self.window;
        let record = self
            .attempts
            .entry(username.to_string())
            .or_insert(FailedAttemptRecord {
                count: 0,
                last_attempt: now,
            });

        if record.count > 0 && now - record.last_attempt > window {
            debug!("Failure window expired for {}, counter reset", username);
            record.count = 0;
        }

        record.count += 1;
        record.last_attempt = now;
        record.count
    }

    /// Forget all failures for a username
    pub fn reset(&mut self, username: &str) {
        self.attempts.remove(username);
    }

    /// Drop every record whose window has passed. Returns how many went.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let window = self.window;
        let before = self.attempts.len();
        self.attempts.retain(|_, r| now - r.last_attempt <= window);

        let removed = before - self.attempts.len();
        if removed > 0 {
            debug!("Pruned {} expired failure records", removed);
        }
        removed
    }

    /// Failures still inside the window; expired records count as 0.
    pub fn count(&self, username: &str, now: DateTime<Utc>) -> u32 {
        self.attempts
            .get(username)
            .filter(|r| !self.is_expired(r, now))
            .map_or(0, |r| r.count)
    }

    /// Number of usernames with a record held
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn get(&self, username: &str) -> Option<&FailedAttemptRecord> {
        self.attempts.get(username)
    }
}
