//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, the auth service, and the token store.

use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthService;
use crate::config::ConfigV1;
use crate::store::TokenStore;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler and contains
/// references to the configuration, auth service, and token store.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Auth service handling login, token verification and refresh.
    pub auth: Arc<AuthService>,
    /// Dual-sink store holding the current session token.
    pub store: Arc<TokenStore>,
    /// Process start time, reported by the health endpoint.
    pub started_at: Instant,
}
