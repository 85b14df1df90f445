//! Configuration store persisted as a flat JSON object on disk.

use crate::error::{Result, SyncError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::ConfigStore;

/// Settings file of the form `{"enable_webhook": "1", ...}`.
///
/// A missing file reads as an empty store. Every `set` rewrites the whole
/// file; writes are serialized through a mutex.
#[derive(Debug)]
pub struct JsonFileConfigStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every setting in the file.
    pub async fn load(&self) -> Result<BTreeMap<String, String>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(SyncError::store(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            SyncError::store(format!("invalid settings file {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| SyncError::store(format!("failed to serialize settings: {}", e)))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            SyncError::store(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl ConfigStore for JsonFileConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::new(dir.path().join("settings.json"));

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.get("enable_webhook").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = JsonFileConfigStore::new(&path);
        store.set("enable_webhook", "1").await.unwrap();
        store.set("webhook_events", "payment.authorized,order.paid").await.unwrap();

        let reopened = JsonFileConfigStore::new(&path);
        assert_eq!(reopened.get("enable_webhook").await.unwrap().as_deref(), Some("1"));
        assert_eq!(
            reopened.get("webhook_events").await.unwrap().as_deref(),
            Some("payment.authorized,order.paid")
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileConfigStore::new(&path).get("enable_webhook").await.unwrap_err();
        assert!(matches!(err, SyncError::Store(_)));
    }
}
