//! Request-time gate for protected paths.
//!
//! Runs before any protected navigation completes: requests whose path falls
//! under a configured protected prefix must carry the session cookie, or
//! they are redirected to the login page with the original destination in a
//! `callbackUrl` query parameter.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;
use url::form_urlencoded;

use crate::state::AppState;

/// Strip one trailing slash so `/profile/` and `/profile` match the same
/// prefix. The root path is exempt.
fn normalize_path(path: &str) -> &str {
    if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

/// A path is protected when it equals a configured prefix or is a
/// descendant of one.
fn is_protected(path: &str, prefixes: &[String]) -> bool {
    let normalized = normalize_path(path);
    prefixes
        .iter()
        .any(|prefix| normalized == prefix || normalized.starts_with(&format!("{}/", prefix)))
}

fn login_redirect(login_path: &str, destination: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(destination.as_bytes()).collect();
    format!("{}?callbackUrl={}", login_path, encoded)
}

/// Middleware enforcing the cookie check on protected paths.
///
/// Only the presence of the cookie gates access here; expiry is enforced
/// downstream by the session validator and the auth service when the token
/// is actually used.
pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if !is_protected(&path, &state.config.guard.protected_prefixes) {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    if jar.get(&state.config.store.cookie.name).is_none() {
        let location = login_redirect(&state.config.guard.login_path, &path);
        debug!("No session cookie for '{}', redirecting to '{}'", path, location);
        return Redirect::temporary(&location).into_response();
    }

    next.run(request).await
}
