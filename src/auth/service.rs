use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::backend::{AuthFailure, CredentialBackend};
use crate::models::token::TokenCodec;
use crate::models::user::User;

/// Login form payload.
#[derive(Deserialize, Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Registration payload. There is no uniqueness check behind it.
#[derive(Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
}

/// Successful login/registration result handed to callers and the UI state.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Successful refresh result: a replacement token, same identity.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The three error classes auth operations can produce. Callers branch on
/// these to pick 400 / 401 / 500 surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Field-keyed validation messages; never fatal, surfaced to the form.
    Validation(HashMap<String, Vec<String>>),
    /// Wrong credentials or an expired/invalid token.
    Unauthorized(String),
    /// Unexpected failure during the operation.
    Server(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Validation(errors) => {
                write!(f, "validation failed for {} field(s)", errors.len())
            }
            AuthError::Unauthorized(msg) | AuthError::Server(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Orchestrates credential verification and token minting.
///
/// Every operation resolves to exactly one success or one `AuthError`; there
/// is no partial state held between calls.
pub struct AuthService {
    backend: Arc<dyn CredentialBackend>,
    codec: TokenCodec,
    token_ttl: i64,
}

impl AuthService {
    pub fn new(backend: Arc<dyn CredentialBackend>, codec: TokenCodec, token_ttl: i64) -> Self {
        AuthService {
            backend,
            codec,
            token_ttl,
        }
    }

    /// Shape validation applied before any credential check.
    fn validate_login(credentials: &LoginCredentials) -> HashMap<String, Vec<String>> {
        let mut errors: HashMap<String, Vec<String>> = HashMap::new();
        if credentials.username.is_empty() {
            errors
                .entry("username".to_string())
                .or_default()
                .push("Username must not be empty".to_string());
        }
        if credentials.password.chars().count() < 6 {
            errors
                .entry("password".to_string())
                .or_default()
                .push("Password must be at least 6 characters".to_string());
        }
        errors
    }

    /// Mint a token for `user` with the configured ttl.
    fn mint(&self, user: &User) -> Result<LoginResponse, AuthError> {
        let token = self
            .codec
            .encode(user, self.token_ttl)
            .map_err(|e| AuthError::Server(e.to_string()))?;
        Ok(LoginResponse {
            token,
            user: user.clone(),
            expires_at: Utc::now() + Duration::seconds(self.token_ttl),
        })
    }

    /// Validate credential shape, check the pair against the backend, and on
    /// success mint a session token. No token is minted on any failure path.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, AuthError> {
        let errors = Self::validate_login(credentials);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let identity = self
            .backend
            .verify_credentials(&credentials.username, &credentials.password)
            .await
            .map_err(|failure| match failure {
                AuthFailure::BadCredentials => {
                    AuthError::Unauthorized("Incorrect username or password".to_string())
                }
                AuthFailure::Unavailable(msg) => {
                    warn!("Credential backend failed: {}", msg);
                    AuthError::Server("Server error, please try again later".to_string())
                }
            })?;

        let user = User::new(
            identity.id,
            identity.username,
            identity.email,
            identity.name,
            Some(identity.roles),
        );

        info!("User '{}' logged in", user.username);
        self.mint(&user)
    }

    /// Decode a token and check its expiry, returning the derived identity.
    /// Decode failures never escape as raw errors.
    pub fn verify_token(&self, token: &str) -> Result<User, AuthError> {
        match self.codec.decode(token) {
            Ok(claims) => {
                if claims.exp <= Utc::now().timestamp() {
                    Err(AuthError::Unauthorized("Token has expired".to_string()))
                } else {
                    Ok(User::from(&claims))
                }
            }
            Err(_) => Err(AuthError::Unauthorized(
                "Token is invalid or expired".to_string(),
            )),
        }
    }

    /// Verify the current token and, if it still stands, mint a replacement
    /// carrying the same identity with a fresh ttl. Verification failures
    /// propagate unchanged.
    pub fn refresh_token(&self, token: &str) -> Result<RefreshResponse, AuthError> {
        let user = self.verify_token(token)?;
        let minted = self.mint(&user)?;
        Ok(RefreshResponse {
            token: minted.token,
            expires_at: minted.expires_at,
        })
    }

    /// Mint a token for a brand-new identity. Always succeeds: there is no
    /// user registry to collide with.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, AuthError> {
        let id = rand::rng().random_range(0..1000).to_string();
        let user = User::new(
            id,
            request.username.clone(),
            request.email.clone(),
            request.name.clone(),
            Some(vec!["user".to_string()]),
        );

        info!("Registered user '{}'", user.username);
        self.mint(&user)
    }

    /// Always reports success. Server-side invalidation (session teardown,
    /// token blacklist) is intentionally absent; callers clear local state
    /// regardless of the outcome.
    pub async fn logout(&self, _token: &str) -> Result<(), AuthError> {
        Ok(())
    }

    /// Pure membership check on the user's roles.
    pub fn has_permission(user: &User, role: &str) -> bool {
        user.has_role(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::backend::{FixtureBackend, FixtureBackendConfig, FixtureUserEntry};
    use crate::config::JWTConfig;

    fn test_service() -> AuthService {
        let backend = FixtureBackend::new(&FixtureBackendConfig {
            name: "TestFixture".to_string(),
            users: vec![FixtureUserEntry {
                id: "1".to_string(),
                username: "user".to_string(),
                password: "123456a@".to_string(),
                email: None,
                name: Some("Admin User".to_string()),
                roles: Some(vec!["user".to_string(), "admin".to_string()]),
            }],
        });
        let codec = TokenCodec::new(&JWTConfig {
            iss: "tokengate-test".to_string(),
            exp: 86400,
            secret: "test-secret".to_string(),
        });
        AuthService::new(Arc::new(backend), codec, 86400)
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&JWTConfig {
            iss: "tokengate-test".to_string(),
            exp: 86400,
            secret: "test-secret".to_string(),
        })
    }

    #[tokio::test]
    async fn test_login_mints_day_long_token() {
        let service = test_service();
        let response = service
            .login(&LoginCredentials {
                username: "user".to_string(),
                password: "123456a@".to_string(),
            })
            .await
            .expect("login should succeed");

        let claims = codec().decode(&response.token).unwrap();
        assert_eq!(claims.exp, claims.iat + 86400);
        assert_eq!(response.user.name, "Admin User");
        assert!(response.user.has_role("admin"));
    }

    #[tokio::test]
    async fn test_login_short_password_is_field_error() {
        let service = test_service();
        let err = service
            .login(&LoginCredentials {
                username: "user".to_string(),
                password: "123".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(errors) => {
                assert!(!errors["password"].is_empty());
                assert!(!errors.contains_key("username"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_empty_username_is_field_error() {
        let service = test_service();
        let err = service
            .login(&LoginCredentials {
                username: String::new(),
                password: "123456a@".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(errors) => assert!(errors.contains_key("username")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_wrong_credentials_is_unauthorized() {
        let service = test_service();
        let err = service
            .login(&LoginCredentials {
                username: "user".to_string(),
                password: "not-the-password".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[test]
    fn test_verify_expired_token() {
        let service = test_service();
        let user = User::new(
            "1".to_string(),
            "user".to_string(),
            "user@example.com".to_string(),
            None,
            None,
        );
        let expired = codec().encode(&user, -60).unwrap();

        let err = service.verify_token(&expired).unwrap_err();
        assert_eq!(err, AuthError::Unauthorized("Token has expired".to_string()));
    }

    #[test]
    fn test_verify_garbage_token() {
        let service = test_service();
        let err = service.verify_token("garbage").unwrap_err();
        assert_eq!(
            err,
            AuthError::Unauthorized("Token is invalid or expired".to_string())
        );
    }

    #[test]
    fn test_refresh_propagates_verify_failure_unchanged() {
        let service = test_service();
        let user = User::new(
            "1".to_string(),
            "user".to_string(),
            "user@example.com".to_string(),
            None,
            None,
        );
        let expired = codec().encode(&user, -60).unwrap();

        let verify_err = service.verify_token(&expired).unwrap_err();
        let refresh_err = service.refresh_token(&expired).unwrap_err();
        assert_eq!(refresh_err, verify_err);
    }

    #[test]
    fn test_refresh_mints_replacement_with_same_identity() {
        let service = test_service();
        let user = User::new(
            "1".to_string(),
            "user".to_string(),
            "user@example.com".to_string(),
            Some("Admin User".to_string()),
            Some(vec!["user".to_string()]),
        );
        let token = codec().encode(&user, 3600).unwrap();

        let refreshed = service.refresh_token(&token).unwrap();
        let claims = codec().decode(&refreshed.token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.username, "user");
        assert_eq!(claims.exp, claims.iat + 86400);
    }

    #[tokio::test]
    async fn test_register_always_succeeds_with_user_role() {
        let service = test_service();
        let response = service
            .register(&RegisterRequest {
                username: "newbie".to_string(),
                email: "newbie@example.com".to_string(),
                name: None,
            })
            .await
            .expect("register should succeed");

        assert_eq!(response.user.roles, vec!["user"]);
        assert_eq!(response.user.name, "newbie");
        assert!(response.user.id.parse::<u32>().is_ok());
    }

    #[tokio::test]
    async fn test_logout_always_succeeds() {
        let service = test_service();
        assert!(service.logout("whatever").await.is_ok());
    }

    #[test]
    fn test_has_permission() {
        let user = User::new(
            "1".to_string(),
            "user".to_string(),
            "user@example.com".to_string(),
            None,
            Some(vec!["user".to_string()]),
        );
        assert!(AuthService::has_permission(&user, "user"));
        assert!(!AuthService::has_permission(&user, "admin"));
    }
}
