//! Configuration store for the payment settings the reconciler reads and writes.
//!
//! The host platform owns this storage; the reconciler only needs string
//! get/set by key. Multi-select values are stored comma-separated.

use crate::error::Result;
use async_trait::async_trait;

mod in_memory;
mod json_file;

pub use in_memory::InMemoryConfigStore;
pub use json_file::JsonFileConfigStore;

/// Keys of the settings touched by webhook reconciliation.
pub mod keys {
    /// Presence gates reconciliation; `"1"` / `"0"`.
    pub const ENABLE_WEBHOOK: &str = "enable_webhook";
    /// Events selected in the admin form.
    pub const WEBHOOK_EVENTS: &str = "webhook_events";
    /// Catalog of events the integration understands.
    pub const SUPPORTED_WEBHOOK_EVENTS: &str = "supported_webhook_events";
    /// Signing secret shared with the gateway.
    pub const WEBHOOK_SECRET: &str = "webhook_secret";
    /// Unix seconds of the last successful create/update.
    pub const WEBHOOK_TRIGGERED_AT: &str = "webhook_triggered_at";
}

/// Key-value store for payment settings.
///
/// Implement this trait over whatever the host platform persists settings in.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Get a setting. `Ok(None)` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a setting, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Typed helpers over [`ConfigStore`].
pub trait ConfigStoreExt: ConfigStore {
    /// Get a setting, treating an empty (or whitespace-only) value as unset.
    async fn get_non_empty(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .get(key)
            .await?
            .filter(|value| !value.trim().is_empty()))
    }

    /// Get a comma-separated list setting.
    async fn get_list(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .get(key)
            .await?
            .map(|raw| parse_list(&raw))
            .unwrap_or_default())
    }

    /// Write a list setting as comma-separated values.
    async fn set_list<I, S>(&self, key: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S> + Send,
        S: AsRef<str>,
    {
        self.set(key, &join_list(values)).await
    }
}

// Blanket implementation - every ConfigStore gets the helpers
impl<T: ConfigStore + ?Sized> ConfigStoreExt for T {}

/// Split a stored multi-select value. Blank segments are dropped.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Join values for storage as a multi-select value.
#[must_use]
pub fn join_list<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
