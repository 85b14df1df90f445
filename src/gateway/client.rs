//! Gateway client trait and wire types for webhook registrations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::error::GatewayResult;

/// Default API root of the gateway.
pub const DEFAULT_BASE_URL: &str = "https://api.razorpay.com/v1";

/// A webhook registration as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteWebhookRecord {
    /// Gateway-assigned id (e.g. `HXjZ0yJrNa1vfz`).
    pub id: String,
    /// Target URL the gateway posts events to.
    pub url: String,
    /// Per-event flags. Only `true` entries are active.
    #[serde(default)]
    pub events: BTreeMap<String, bool>,
    /// Whether the registration as a whole is active.
    #[serde(default)]
    pub active: bool,
}

impl RemoteWebhookRecord {
    /// Event names whose flag is `true`.
    #[must_use]
    pub fn active_events(&self) -> BTreeSet<String> {
        self.events
            .iter()
            .filter(|(_, active)| **active)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// The full listing returned by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookList {
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub items: Vec<RemoteWebhookRecord>,
}

/// Body for creating or editing a webhook registration.
///
/// `events` and `secret` are left out of the request when `None`, which is
/// how a registration is deactivated without touching its subscriptions.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub active: bool,
}

impl WebhookPayload {
    /// An active registration for `url` subscribed to exactly `events`.
    #[must_use]
    pub fn subscribe(url: impl Into<String>, events: &BTreeSet<String>, secret: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: Some(events.iter().map(|e| (e.clone(), true)).collect()),
            secret: Some(secret.into()),
            active: true,
        }
    }

    /// An edit that switches the registration for `url` off.
    #[must_use]
    pub fn deactivate(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: None,
            secret: None,
            active: false,
        }
    }

    /// Event names switched on by this payload.
    #[must_use]
    pub fn event_names(&self) -> BTreeSet<String> {
        self.events
            .iter()
            .flatten()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

// Debug implementation that doesn't expose the signing secret
impl std::fmt::Debug for WebhookPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookPayload")
            .field("url", &self.url)
            .field("events", &self.events)
            .field("has_secret", &self.secret.is_some())
            .field("active", &self.active)
            .finish()
    }
}

/// Trait for the gateway's webhook API.
///
/// This abstraction allows testing without real gateway calls and supports
/// different client implementations.
#[allow(async_fn_in_trait)]
pub trait GatewayClient: Send + Sync {
    /// Fetch every webhook registered for the account.
    async fn list_webhooks(&self) -> GatewayResult<WebhookList>;

    /// Register a new webhook.
    async fn create_webhook(&self, payload: &WebhookPayload) -> GatewayResult<RemoteWebhookRecord>;

    /// Edit the registration identified by `webhook_id`.
    async fn update_webhook(
        &self,
        payload: &WebhookPayload,
        webhook_id: &str,
    ) -> GatewayResult<RemoteWebhookRecord>;
}
