use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::auth::BackendConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0, containing the store, credential backend,
/// route guard, JWT settings and logging.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    pub jwt: JWTConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub guard: GuardConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

/// Load config from "config.yaml" in the current directory, with
/// TOKENGATE_-prefixed environment variables taking precedence.
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("TOKENGATE_").split("__"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

/// Settings for minting and verifying session tokens.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct JWTConfig {
    pub iss: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub exp: i64,
    pub secret: String,
}

fn default_token_ttl() -> i64 {
    60 * 60 * 24
}

/// Route guard settings: which path prefixes require a token, and where
/// unauthenticated requests are sent.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct GuardConfig {
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            protected_prefixes: default_protected_prefixes(),
            login_path: default_login_path(),
        }
    }
}

fn default_protected_prefixes() -> Vec<String> {
    vec![
        "/profile".to_string(),
        "/settings".to_string(),
        "/dashboard".to_string(),
    ]
}

fn default_login_path() -> String {
    "/login".to_string()
}
