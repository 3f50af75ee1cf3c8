use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::config::FileStoreConfig;
use crate::store::TokenSink;

/// Key under which the session token is stored in the key-value file.
const TOKEN_KEY: &str = "token";

/// A durable sink backed by a small JSON key-value file, the server-side
/// analog of browser local storage.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(config: &FileStoreConfig) -> Self {
        FileSink {
            path: PathBuf::from(&config.path),
        }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| format!("Corrupt store file {}: {}", self.path.display(), e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(format!("Failed to read {}: {}", self.path.display(), e)),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(map)
            .map_err(|e| format!("Failed to serialize store file: {}", e))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }
}

#[async_trait]
impl TokenSink for FileSink {
    fn name(&self) -> &str {
        "durable-store"
    }

    async fn write(&self, token: &str) -> Result<(), String> {
        let mut map = self.read_map().await?;
        map.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_map(&map).await?;
        debug!("Wrote token to {}", self.path.display());
        Ok(())
    }

    async fn read(&self) -> Result<Option<String>, String> {
        Ok(self.read_map().await?.get(TOKEN_KEY).cloned())
    }

    async fn delete(&self) -> Result<(), String> {
        let mut map = self.read_map().await?;
        if map.remove(TOKEN_KEY).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink_in(dir: &std::path::Path) -> FileSink {
        FileSink::new(&FileStoreConfig {
            path: dir.join("state").join("session.json").to_string_lossy().into_owned(),
        })
    }

    #[tokio::test]
    async fn test_read_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink_in(dir.path());
        assert_eq!(sink.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink_in(dir.path());

        sink.write("tok-1").await.unwrap();
        assert_eq!(sink.read().await.unwrap().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink_in(dir.path());

        sink.write("tok-1").await.unwrap();
        sink.delete().await.unwrap();
        sink.delete().await.unwrap();
        assert_eq!(sink.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let sink = FileSink::new(&FileStoreConfig {
            path: path.to_string_lossy().into_owned(),
        });
        assert!(sink.read().await.is_err());
    }
}
