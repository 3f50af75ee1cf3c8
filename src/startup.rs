//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including initialization of the credential backend, token store, auth
//! service and route setup.

use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tracing::info;

use crate::auth::{create_backend, AuthService};
use crate::config::ConfigV1;
use crate::models::token::TokenCodec;
use crate::routes;
use crate::state::AppState;
use crate::store::create_store;

/// Initializes and runs the application server.
///
/// Sets up the credential backend, token store and auth service, builds the
/// router and binds to the address specified in the configuration.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let store = create_store(&config.store);
    let backend = create_backend(&config.backend);
    let codec = TokenCodec::new(&config.jwt);
    let auth = Arc::new(AuthService::new(backend, codec, config.jwt.exp));

    info!("Starting server on {}", config.bind_address);

    let state = AppState {
        config: config.clone(),
        auth,
        store,
        started_at: Instant::now(),
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
