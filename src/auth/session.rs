use std::sync::Arc;

use chrono::Utc;

use crate::models::token::TokenCodec;
use crate::models::user::User;
use crate::store::TokenStore;

/// Derives the current session ("is logged in", "who is it") from whatever
/// token the store holds right now. Nothing is cached: every question loads
/// and decodes afresh, so staleness is bounded by the moment of the check.
///
/// Decode failures never escape this boundary; they collapse to
/// `false`/`None`.
pub struct SessionValidator {
    store: Arc<TokenStore>,
    codec: TokenCodec,
}

impl SessionValidator {
    pub fn new(store: Arc<TokenStore>, codec: TokenCodec) -> Self {
        SessionValidator { store, codec }
    }

    /// True iff a token is present, decodes, and expires strictly after now.
    pub async fn is_valid(&self) -> bool {
        let Some(token) = self.store.load().await else {
            return false;
        };
        match self.codec.decode(&token) {
            Ok(claims) => claims.exp > Utc::now().timestamp(),
            Err(_) => false,
        }
    }

    /// The identity carried by the current token, absent when there is no
    /// token or it is malformed or expired.
    pub async fn current_user(&self) -> Option<User> {
        let token = self.store.load().await?;
        let claims = self.codec.decode(&token).ok()?;
        if claims.exp <= Utc::now().timestamp() {
            return None;
        }
        Some(User::from(&claims))
    }

    /// Role membership for the current session user; false without a user.
    pub async fn has_role(&self, role: &str) -> bool {
        match self.current_user().await {
            Some(user) => user.has_role(role),
            None => false,
        }
    }
}
