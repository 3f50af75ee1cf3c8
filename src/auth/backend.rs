use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Identity returned by a credential backend on a successful check.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
}

/// Why a credential check did not produce an identity.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// Username/password pair does not match any known account.
    BadCredentials,
    /// The backend itself failed (network, storage, ...).
    Unavailable(String),
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::BadCredentials => write!(f, "wrong username or password"),
            AuthFailure::Unavailable(msg) => write!(f, "backend unavailable: {}", msg),
        }
    }
}

/// A credential backend must be able to turn a username/password pair into
/// a `UserIdentity` or an `AuthFailure`. The production verifier lives
/// behind this seam; the fixture backend below stands in for it.
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    fn get_name(&self) -> &str;
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthFailure>;
}

/// Configuration options for each credential backend.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
#[serde(tag = "type")]
pub enum BackendConfig {
    #[serde(rename = "fixture")]
    Fixture(FixtureBackendConfig),
}

/// FixtureBackendConfig lists the accounts accepted by the fixture backend.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct FixtureBackendConfig {
    /// A friendly name for logs.
    pub name: String,
    /// The account list checked against incoming credentials.
    pub users: Vec<FixtureUserEntry>,
}

/// Represents a single account entry (username + password + identity).
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct FixtureUserEntry {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// Create a credential backend from a given config.
pub fn create_backend(config: &BackendConfig) -> Arc<dyn CredentialBackend> {
    match config {
        BackendConfig::Fixture(cfg) => Arc::new(FixtureBackend::new(cfg)),
    }
}

/// A `FixtureBackend` that checks credentials against the account list in
/// its config. There is no persistent user registry behind it.
pub struct FixtureBackend {
    config: FixtureBackendConfig,
}

impl FixtureBackend {
    pub fn new(config: &FixtureBackendConfig) -> Self {
        info!("Creating fixture credential backend '{}'", config.name);
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl CredentialBackend for FixtureBackend {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthFailure> {
        debug!("Credential check for user '{}'", username);

        for entry in &self.config.users {
            if entry.username == username && entry.password == password {
                return Ok(UserIdentity {
                    id: entry.id.clone(),
                    username: entry.username.clone(),
                    email: entry
                        .email
                        .clone()
                        .unwrap_or_else(|| format!("{}@example.com", entry.username)),
                    name: entry.name.clone(),
                    roles: entry.roles.clone().unwrap_or_default(),
                });
            }
        }

        Err(AuthFailure::BadCredentials)
    }
}
