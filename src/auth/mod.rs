pub mod backend;
pub mod service;
pub mod session;
pub mod state;

// Re-export the primary auth items so code outside can do
// "use crate::auth::{AuthService, create_backend};"
pub use backend::{create_backend, AuthFailure, BackendConfig, CredentialBackend, UserIdentity};
pub use service::{
    AuthError, AuthService, LoginCredentials, LoginResponse, RefreshResponse, RegisterRequest,
};
pub use session::SessionValidator;
pub use state::{AuthAction, AuthState, AuthStore, UserPatch};
