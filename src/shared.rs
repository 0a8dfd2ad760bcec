//! Shared store handle
//!
//! Every store operation is a check-then-write sequence, so concurrent hosts
//! go through one mutex that serializes all of them.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::{CredentialStore, UserSummary};
use crate::error::AuthError;

/// Cloneable, task-safe handle to a [`CredentialStore`]
#[derive(Clone)]
pub struct SharedCredentialStore {
    inner: Arc<Mutex<CredentialStore>>,
}

impl SharedCredentialStore {
    pub fn new(store: CredentialStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<bool, AuthError> {
        self.inner.lock().await.register(username, password, email)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserSummary>, AuthError> {
        self.inner.lock().await.authenticate(username, password)
    }

    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, AuthError> {
        self.inner
            .lock()
            .await
            .change_password(username, old_password, new_password)
    }

    pub async fn deactivate(&self, username: &str) -> bool {
        self.inner.lock().await.deactivate(username)
    }

    pub async fn is_locked(&self, username: &str) -> bool {
        self.inner.lock().await.is_locked(username)
    }

    pub async fn failed_attempts(&self, username: &str) -> u32 {
        self.inner.lock().await.failed_attempts(username)
    }
}
