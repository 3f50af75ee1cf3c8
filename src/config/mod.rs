// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod config;
pub mod logging;
pub mod store;

pub use config::{load_config, print_schema, Config, ConfigV1, GuardConfig, JWTConfig};
pub use logging::LoggingConfig;
pub use store::{CookieConfig, FileStoreConfig, StoreConfig};
