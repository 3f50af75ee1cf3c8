use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::cookie_store::CookieSink;
use super::file_store::FileSink;
use crate::config::StoreConfig;

/// The TokenSink trait abstracts one location holding the current session
/// token (write, read, delete).
#[async_trait]
pub trait TokenSink: Send + Sync {
    /// A short name for log lines.
    fn name(&self) -> &str;
    async fn write(&self, token: &str) -> Result<(), String>;
    async fn read(&self) -> Result<Option<String>, String>;
    async fn delete(&self) -> Result<(), String>;
}

/// Holds the current session token in redundant sinks: a durable key-value
/// file plus a cookie jar, so both script-side and request-side code can
/// read it.
///
/// Writes go to every sink (best effort, failures logged); reads take the
/// first sink that has a value, in registration order. There is no locking
/// and no cross-sink atomicity: the last writer wins, and a failure between
/// sink writes leaves them inconsistent until the next save or clear.
pub struct TokenStore {
    sinks: Vec<Arc<dyn TokenSink>>,
}

impl TokenStore {
    /// Build a store over the given sinks. Read order follows registration
    /// order, so the durable sink should come first.
    pub fn new(sinks: Vec<Arc<dyn TokenSink>>) -> Self {
        TokenStore { sinks }
    }

    /// Write the token to every sink.
    pub async fn save(&self, token: &str) {
        let writes = self.sinks.iter().map(|sink| {
            let sink = sink.clone();
            let token = token.to_string();
            async move { (sink.name().to_string(), sink.write(&token).await) }
        });

        for (name, result) in join_all(writes).await {
            if let Err(e) = result {
                warn!("Failed to write token to sink '{}': {}", name, e);
            }
        }
    }

    /// Read the current token, falling back through the sinks in order.
    pub async fn load(&self) -> Option<String> {
        for sink in &self.sinks {
            match sink.read().await {
                Ok(Some(token)) => return Some(token),
                Ok(None) => continue,
                Err(e) => {
                    warn!("Failed to read token from sink '{}': {}", sink.name(), e);
                    continue;
                }
            }
        }
        None
    }

    /// Delete the token from every sink.
    pub async fn clear(&self) {
        let deletes = self.sinks.iter().map(|sink| {
            let sink = sink.clone();
            async move { (sink.name().to_string(), sink.delete().await) }
        });

        for (name, result) in join_all(deletes).await {
            match result {
                Ok(()) => debug!("Deleted token from sink '{}'", name),
                Err(e) => warn!("Failed to delete token from sink '{}': {}", name, e),
            }
        }

        let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        info!("Session token cleared from {}", names.join(" and "));
    }
}

/// Creates the standard dual-sink store from the store configuration:
/// durable file first, cookie jar as fallback.
pub fn create_store(config: &StoreConfig) -> Arc<TokenStore> {
    let sinks: Vec<Arc<dyn TokenSink>> = vec![
        Arc::new(FileSink::new(&config.file)),
        Arc::new(CookieSink::new(&config.cookie)),
    ];
    Arc::new(TokenStore::new(sinks))
}
