//! In-memory configuration store.

use crate::error::{Result, SyncError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::ConfigStore;

/// Configuration store held in process memory.
///
/// Clones share the same underlying map, so a test can hand one clone to
/// the reconciler and inspect another afterwards.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `values`.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Arc::new(RwLock::new(map)),
        }
    }

    /// Copy of every stored setting.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| SyncError::store("config store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| SyncError::store("config store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_and_set() {
        let store = InMemoryConfigStore::new();
        assert_eq!(store.get("enable_webhook").await.unwrap(), None);

        store.set("enable_webhook", "1").await.unwrap();
        assert_eq!(store.get("enable_webhook").await.unwrap().as_deref(), Some("1"));

        store.set("enable_webhook", "0").await.unwrap();
        assert_eq!(store.get("enable_webhook").await.unwrap().as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryConfigStore::with_values([("webhook_secret", "abc")]);
        let clone = store.clone();

        clone.set("webhook_triggered_at", "1700000000").await.unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["webhook_secret"], "abc");
        assert_eq!(snapshot["webhook_triggered_at"], "1700000000");
    }
}
