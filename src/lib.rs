pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod shared;
pub mod utils;

pub use crate::auth::{CredentialStore, UserSummary};
pub use crate::config::AuthConfig;
pub use crate::error::{AuthError, ConfigError};
pub use crate::shared::SharedCredentialStore;
