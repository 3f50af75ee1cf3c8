//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! authentication, user records, and health checks. The route guard is
//! layered over the assembled router.

mod auth_routes;
mod health_routes;
mod user_routes;

use axum::middleware;
use axum::Router;

use crate::guard;
use crate::state::AppState;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, layers the protected-path
/// guard over them, and attaches the application state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes::routes())
        .merge(user_routes::routes())
        .merge(health_routes::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_token,
        ))
        .with_state(state)
}
