use std::sync::Arc;

use tracing::debug;

use crate::auth::service::{AuthError, LoginResponse, RefreshResponse};
use crate::models::user::User;
use crate::store::TokenStore;

/// The process-wide auth state mirrored for UI consumption.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<AuthError>,
}

/// Every transition the store understands: one tagged pending / fulfilled /
/// rejected triple per tracked async operation.
#[derive(Debug, Clone)]
pub enum AuthAction {
    LoginPending,
    LoginFulfilled(LoginResponse),
    LoginRejected(AuthError),

    RegisterPending,
    /// Registration may or may not auto-login; a token is only adopted when
    /// the payload carries one.
    RegisterFulfilled(Option<LoginResponse>),
    RegisterRejected(AuthError),

    LogoutPending,
    LogoutFulfilled,
    /// Logout failures still clear local credentials: from the client's
    /// perspective logout always succeeds.
    LogoutRejected,

    VerifyPending,
    VerifyFulfilled(User),
    VerifyRejected,

    RefreshPending,
    RefreshFulfilled(RefreshResponse),
    RefreshRejected,
}

/// A partial user update applied by `update_user_info`.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Option<Vec<String>>,
    pub avatar_url: Option<String>,
}

/// Single owned store for the auth state, mutated only through `dispatch`
/// and the synchronous mutators below. Token persistence side effects
/// (save on login/register/refresh, clear on logout) happen inside the
/// transitions so state and storage move together.
pub struct AuthStore {
    state: AuthState,
    tokens: Arc<TokenStore>,
}

impl AuthStore {
    /// Seed the state from whatever token is currently persisted. The token
    /// alone does not make the session authenticated; a verify has to
    /// confirm it first.
    pub async fn initialize(tokens: Arc<TokenStore>) -> Self {
        let token = tokens.load().await;
        AuthStore {
            state: AuthState {
                token,
                ..AuthState::default()
            },
            tokens,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Apply one transition.
    pub async fn dispatch(&mut self, action: AuthAction) {
        debug!("Auth state transition: {:?}", action_name(&action));
        match action {
            AuthAction::LoginPending => {
                self.state.loading = true;
                self.state.error = None;
            }
            AuthAction::LoginFulfilled(response) => {
                self.adopt_session(response).await;
            }
            AuthAction::LoginRejected(error) => {
                self.state.loading = false;
                self.state.is_authenticated = false;
                self.state.error = Some(error);
            }

            AuthAction::RegisterPending => {
                self.state.loading = true;
                self.state.error = None;
            }
            AuthAction::RegisterFulfilled(Some(response)) => {
                self.adopt_session(response).await;
            }
            AuthAction::RegisterFulfilled(None) => {
                self.state.loading = false;
            }
            AuthAction::RegisterRejected(error) => {
                self.state.loading = false;
                self.state.error = Some(error);
            }

            AuthAction::LogoutPending => {
                self.state.loading = true;
            }
            AuthAction::LogoutFulfilled | AuthAction::LogoutRejected => {
                self.state.token = None;
                self.state.user = None;
                self.state.is_authenticated = false;
                self.state.loading = false;
                self.tokens.clear().await;
            }

            AuthAction::VerifyPending => {
                self.state.loading = true;
            }
            AuthAction::VerifyFulfilled(user) => {
                self.state.user = Some(user);
                self.state.is_authenticated = true;
                self.state.loading = false;
                self.state.error = None;
            }
            AuthAction::VerifyRejected => {
                // In-memory identity only; the persisted token is left for
                // the next save or clear to reconcile.
                self.state.token = None;
                self.state.user = None;
                self.state.is_authenticated = false;
                self.state.loading = false;
            }

            AuthAction::RefreshPending => {
                self.state.loading = true;
            }
            AuthAction::RefreshFulfilled(response) => {
                self.tokens.save(&response.token).await;
                self.state.token = Some(response.token);
                self.state.is_authenticated = true;
                self.state.loading = false;
            }
            AuthAction::RefreshRejected => {
                self.state.loading = false;
            }
        }
    }

    async fn adopt_session(&mut self, response: LoginResponse) {
        self.tokens.save(&response.token).await;
        self.state.token = Some(response.token);
        self.state.user = Some(response.user);
        self.state.is_authenticated = true;
        self.state.loading = false;
        self.state.error = None;
    }

    /// Force-set the session, persisting the token.
    pub async fn set_credentials(&mut self, token: String, user: User) {
        self.tokens.save(&token).await;
        self.state.token = Some(token);
        self.state.user = Some(user);
        self.state.is_authenticated = true;
    }

    /// Drop the session and the persisted token.
    pub async fn clear_credentials(&mut self) {
        self.state.token = None;
        self.state.user = None;
        self.state.is_authenticated = false;
        self.state.error = None;
        self.tokens.clear().await;
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Shallow-merge a patch into the current user. No-op without one.
    pub fn update_user_info(&mut self, patch: UserPatch) {
        let Some(user) = self.state.user.as_mut() else {
            return;
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(roles) = patch.roles {
            user.roles = roles;
        }
        if let Some(avatar_url) = patch.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
    }
}

fn action_name(action: &AuthAction) -> &'static str {
    match action {
        AuthAction::LoginPending => "login/pending",
        AuthAction::LoginFulfilled(_) => "login/fulfilled",
        AuthAction::LoginRejected(_) => "login/rejected",
        AuthAction::RegisterPending => "register/pending",
        AuthAction::RegisterFulfilled(_) => "register/fulfilled",
        AuthAction::RegisterRejected(_) => "register/rejected",
        AuthAction::LogoutPending => "logout/pending",
        AuthAction::LogoutFulfilled => "logout/fulfilled",
        AuthAction::LogoutRejected => "logout/rejected",
        AuthAction::VerifyPending => "verify/pending",
        AuthAction::VerifyFulfilled(_) => "verify/fulfilled",
        AuthAction::VerifyRejected => "verify/rejected",
        AuthAction::RefreshPending => "refresh/pending",
        AuthAction::RefreshFulfilled(_) => "refresh/fulfilled",
        AuthAction::RefreshRejected => "refresh/rejected",
    }
}
