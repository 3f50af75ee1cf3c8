//! Authentication endpoint handlers.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::auth::{AuthError, LoginCredentials, LoginResponse};
use crate::state::AppState;
use crate::utils::http_helpers::{bad_request, server_error, success, unauthorized, ApiReply};

/// Registers authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Validates credentials and mints a session token.
///
/// The minted token is persisted to the token store before the response is
/// sent. Failures map onto the envelope's three error classes: field
/// validation (400), bad credentials (401), backend failure (500).
async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiReply<LoginResponse> {
    match state.auth.login(&credentials).await {
        Ok(response) => {
            state.store.save(&response.token).await;
            success(response, "Login successful")
        }
        Err(AuthError::Validation(errors)) => bad_request("Invalid login data", Some(errors)),
        Err(AuthError::Unauthorized(message)) => unauthorized(&message),
        Err(AuthError::Server(message)) => server_error(&message),
    }
}
