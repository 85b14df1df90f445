use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::gateway::{
    GatewayClient, GatewayError, GatewayResult, RemoteWebhookRecord, WebhookList, WebhookPayload,
};

/// A call received by [`MockGatewayClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List,
    Create(WebhookPayload),
    Update { id: String, payload: WebhookPayload },
}

#[derive(Default)]
struct MockState {
    webhooks: Vec<RemoteWebhookRecord>,
    calls: Vec<GatewayCall>,
    list_error: Option<GatewayError>,
    create_error: Option<GatewayError>,
    update_error: Option<GatewayError>,
}

#[derive(Default)]
struct MockInner {
    counter: AtomicU64,
    state: RwLock<MockState>,
}

/// Mock gateway for testing.
///
/// Keeps registrations in memory: create appends one, update edits it in
/// place. Every call is recorded. Clones share state.
#[derive(Clone, Default)]
pub struct MockGatewayClient {
    inner: Arc<MockInner>,
}

impl MockGatewayClient {
    /// Create a mock with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing registration.
    #[must_use]
    pub fn with_webhook(self, record: RemoteWebhookRecord) -> Self {
        self.state().webhooks.push(record);
        self
    }

    /// Make every listing fail with `error`.
    #[must_use]
    pub fn fail_list(self, error: GatewayError) -> Self {
        self.state().list_error = Some(error);
        self
    }

    /// Make every create fail with `error`.
    #[must_use]
    pub fn fail_create(self, error: GatewayError) -> Self {
        self.state().create_error = Some(error);
        self
    }

    /// Make every update fail with `error`.
    #[must_use]
    pub fn fail_update(self, error: GatewayError) -> Self {
        self.state().update_error = Some(error);
        self
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.inner.state.read().unwrap().calls.clone()
    }

    /// Payloads of every create call.
    pub fn create_calls(&self) -> Vec<WebhookPayload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Create(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// `(webhook_id, payload)` of every update call.
    pub fn update_calls(&self) -> Vec<(String, WebhookPayload)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Update { id, payload } => Some((id, payload)),
                _ => None,
            })
            .collect()
    }

    /// Registrations currently held.
    pub fn webhooks(&self) -> Vec<RemoteWebhookRecord> {
        self.inner.state.read().unwrap().webhooks.clone()
    }

    fn state(&self) -> std::sync::RwLockWriteGuard<'_, MockState> {
        self.inner.state.write().unwrap()
    }
}

impl GatewayClient for MockGatewayClient {
    async fn list_webhooks(&self) -> GatewayResult<WebhookList> {
        let mut state = self.state();
        state.calls.push(GatewayCall::List);
        if let Some(ref error) = state.list_error {
            return Err(error.clone());
        }

        Ok(WebhookList {
            entity: "collection".to_string(),
            count: state.webhooks.len(),
            items: state.webhooks.clone(),
        })
    }

    async fn create_webhook(&self, payload: &WebhookPayload) -> GatewayResult<RemoteWebhookRecord> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Create(payload.clone()));
        if let Some(ref error) = state.create_error {
            return Err(error.clone());
        }

        let record = RemoteWebhookRecord {
            id: format!("wh_test_{}", self.inner.counter.fetch_add(1, Ordering::SeqCst)),
            url: payload.url.clone(),
            events: payload.events.clone().unwrap_or_default(),
            active: payload.active,
        };
        state.webhooks.push(record.clone());
        Ok(record)
    }

    async fn update_webhook(
        &self,
        payload: &WebhookPayload,
        webhook_id: &str,
    ) -> GatewayResult<RemoteWebhookRecord> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Update {
            id: webhook_id.to_string(),
            payload: payload.clone(),
        });
        if let Some(ref error) = state.update_error {
            return Err(error.clone());
        }

        let Some(record) = state.webhooks.iter_mut().find(|w| w.id == webhook_id) else {
            return Err(GatewayError::Api {
                operation: "update_webhook".to_string(),
                message: format!("The id provided does not exist: {}", webhook_id),
                code: Some("BAD_REQUEST_ERROR".to_string()),
                http_status: Some(400),
            });
        };

        record.url = payload.url.clone();
        if let Some(ref events) = payload.events {
            record.events = events.clone();
        }
        record.active = payload.active;
        Ok(record.clone())
    }
}
