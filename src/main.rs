//! Credential Store - Demo Entry Point
//!
//! Registers a user, logs in, then hammers the account with bad passwords
//! until it locks.

use log::{info, warn};

use credential_store::error::handlers::{log_auth_error, log_error};
use credential_store::utils::logging::setup_logging;
use credential_store::{AuthConfig, CredentialStore, SharedCredentialStore};

const DEMO_USER: &str = "john_doe";
const DEMO_PASSWORD: &str = "secure_password123";
const DEMO_EMAIL: &str = "john@example.com";

#[tokio::main]
async fn main() {
    setup_logging();

    let config = match AuthConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default configuration: {}", e);
            AuthConfig::default()
        }
    };

    let store = match CredentialStore::new(config) {
        Ok(store) => SharedCredentialStore::new(store),
        Err(e) => {
            log_error(&e);
            std::process::exit(1);
        }
    };

    info!("Launching credential store demo...");

    match store.register(DEMO_USER, DEMO_PASSWORD, DEMO_EMAIL).await {
        Ok(true) => info!("Registration succeeded"),
        Ok(false) => info!("Registration failed: username taken"),
        Err(e) => log_auth_error(&e),
    }

    match store.authenticate(DEMO_USER, DEMO_PASSWORD).await {
        Ok(Some(summary)) => info!("Login succeeded: {:?}", summary),
        Ok(None) => info!("Login failed"),
        Err(e) => log_auth_error(&e),
    }

    for attempt in 1..=4 {
        match store.authenticate(DEMO_USER, "wrong_password").await {
            Ok(Some(_)) => info!("Attempt {}: succeeded", attempt),
            Ok(None) => info!("Attempt {}: failed", attempt),
            Err(e) => log_auth_error(&e),
        }
    }
}
