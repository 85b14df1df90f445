//! Admin form fields and the stored webhook settings.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::store::{ConfigStore, ConfigStoreExt, keys};

/// The payment settings form as submitted by an admin.
///
/// When the save hook fires the form has already been committed, so the
/// usual source is [`SubmittedFields::from_store`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SubmittedFields {
    /// Raw `enable_webhook` value. Reconciliation runs when it is present.
    pub enable_webhook: Option<String>,
    /// Events ticked in the multi-select.
    pub webhook_events: Vec<String>,
    /// The catalog of events the integration understands.
    pub supported_webhook_events: Vec<String>,
    /// Secret field as submitted. Only [`commit`](Self::commit) persists
    /// it; reconciliation reads the secret from the store.
    pub webhook_secret: Option<String>,
}

impl SubmittedFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enable flag as the form would (`"1"` or `"0"`).
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enable_webhook = Some(if enabled { "1" } else { "0" }.to_string());
        self
    }

    #[must_use]
    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.webhook_events = events.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn supported_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_webhook_events = events.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Read the committed form back from the store.
    pub async fn from_store<S: ConfigStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self {
            enable_webhook: store.get(keys::ENABLE_WEBHOOK).await?,
            webhook_events: store.get_list(keys::WEBHOOK_EVENTS).await?,
            supported_webhook_events: store.get_list(keys::SUPPORTED_WEBHOOK_EVENTS).await?,
            webhook_secret: store.get_non_empty(keys::WEBHOOK_SECRET).await?,
        })
    }

    /// Commit the form to the store, as the admin save does.
    ///
    /// The secret is only written when one was submitted, so an existing
    /// secret is never blanked by a save.
    pub async fn commit<S: ConfigStore + ?Sized>(&self, store: &S) -> Result<()> {
        if let Some(ref flag) = self.enable_webhook {
            store.set(keys::ENABLE_WEBHOOK, flag).await?;
        }
        store.set_list(keys::WEBHOOK_EVENTS, &self.webhook_events).await?;
        store
            .set_list(keys::SUPPORTED_WEBHOOK_EVENTS, &self.supported_webhook_events)
            .await?;
        if let Some(ref secret) = self.webhook_secret {
            if !secret.trim().is_empty() {
                store.set(keys::WEBHOOK_SECRET, secret).await?;
            }
        }
        Ok(())
    }

    /// Whether the enable flag was submitted at all.
    #[must_use]
    pub fn is_enable_present(&self) -> bool {
        self.enable_webhook.is_some()
    }

    /// Whether the enable flag reads as on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enable_webhook.as_deref().is_some_and(is_truthy)
    }
}

/// The webhook settings as persisted, plus the remote id once known.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub url: String,
    pub desired_events: BTreeSet<String>,
    pub supported_events: BTreeSet<String>,
    pub secret: Option<String>,
    pub remote_id: Option<String>,
    /// Unix seconds of the last successful create/update.
    pub triggered_at: Option<i64>,
}

impl WebhookConfig {
    /// Load the stored settings for the webhook at `url`.
    ///
    /// `remote_id` is not persisted; it is filled in from the gateway listing.
    pub async fn load<S: ConfigStore + ?Sized>(store: &S, url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            enabled: store
                .get(keys::ENABLE_WEBHOOK)
                .await?
                .as_deref()
                .is_some_and(is_truthy),
            url: url.into(),
            desired_events: store.get_list(keys::WEBHOOK_EVENTS).await?.into_iter().collect(),
            supported_events: store
                .get_list(keys::SUPPORTED_WEBHOOK_EVENTS)
                .await?
                .into_iter()
                .collect(),
            secret: store.get_non_empty(keys::WEBHOOK_SECRET).await?,
            remote_id: None,
            triggered_at: store
                .get_non_empty(keys::WEBHOOK_TRIGGERED_AT)
                .await?
                .and_then(|raw| raw.trim().parse().ok()),
        })
    }
}

// Debug implementations that don't expose the signing secret
impl std::fmt::Debug for SubmittedFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmittedFields")
            .field("enable_webhook", &self.enable_webhook)
            .field("webhook_events", &self.webhook_events)
            .field("supported_webhook_events", &self.supported_webhook_events)
            .field("has_webhook_secret", &self.webhook_secret.is_some())
            .finish()
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("enabled", &self.enabled)
            .field("url", &self.url)
            .field("desired_events", &self.desired_events)
            .field("supported_events", &self.supported_events)
            .field("has_secret", &self.secret.is_some())
            .field("remote_id", &self.remote_id)
            .field("triggered_at", &self.triggered_at)
            .finish()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// The event set to subscribe: the admin's selection plus every event the
/// existing registration already has on that is still in the supported
/// catalog.
#[must_use]
pub fn merge_events<A, B, C>(selected: A, previously_active: B, supported: C) -> BTreeSet<String>
where
    A: IntoIterator,
    A::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let supported: BTreeSet<String> = supported
        .into_iter()
        .map(|e| e.as_ref().to_string())
        .collect();

    let mut events: BTreeSet<String> = selected
        .into_iter()
        .map(|e| e.as_ref().to_string())
        .filter(|e| !e.is_empty())
        .collect();

    events.extend(
        previously_active
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .filter(|e| supported.contains(e)),
    );

    events
}
