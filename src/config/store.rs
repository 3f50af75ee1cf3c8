use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configuration for the dual-sink token store: a durable key-value file
/// plus an HTTP cookie, kept write-both/clear-both.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct StoreConfig {
    pub file: FileStoreConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
}

/// Location of the durable key-value file backing the store.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStoreConfig {
    pub path: String,
}

/// Cookie attributes used when persisting the token to the cookie sink.
///
/// `host` is the externally visible serving host. The `Domain` attribute is
/// omitted for loopback/development hosts and set explicitly otherwise.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Cookie lifetime in seconds.
    #[serde(default = "default_cookie_max_age")]
    pub max_age: i64,
    #[serde(default)]
    pub host: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        CookieConfig {
            name: default_cookie_name(),
            max_age: default_cookie_max_age(),
            host: None,
        }
    }
}

fn default_cookie_name() -> String {
    "token".to_string()
}

fn default_cookie_max_age() -> i64 {
    60 * 60 * 24 * 7
}
