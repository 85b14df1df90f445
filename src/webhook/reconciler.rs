//! Webhook reconciliation against the gateway.
//!
//! Runs once per admin save of the payment settings:
//! 1. Check the webhook target resolves to a public IPv4 address
//! 2. Find the registration for the target URL, if any
//! 3. Merge the selected events with still-supported active ones
//! 4. Reuse or generate the signing secret
//! 5. Update the registration, or create it, and stamp `webhook_triggered_at`
//!
//! A failed sync must never fail the save. Every gateway call returns a
//! `Result`; [`WebhookReconciler::reconcile`] turns an error into a logged
//! [`ReconciliationOutcome::Failed`] and returns normally.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::gateway::{ExistingWebhook, GatewayClient, RemoteWebhookLookup, WebhookPayload};
use crate::store::{ConfigStore, ConfigStoreExt, keys};

use super::audit::{SyncAuditEvent, SyncAuditLogger, TracingAuditLogger};
use super::fields::{SubmittedFields, WebhookConfig, merge_events};
use super::host::{HostCheck, HostResolver, SkipReason, SystemResolver, check_target};
use super::secret::SecretGenerator;

/// What a reconciliation run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// Preconditions failed; no gateway call, no config change.
    Skipped { reason: SkipReason },
    /// A new registration was created.
    Created { webhook_id: String, events: BTreeSet<String> },
    /// The existing registration was updated.
    Updated { webhook_id: String, events: BTreeSet<String> },
    /// A failure was caught, logged and suppressed.
    Failed { message: String },
}

impl ReconciliationOutcome {
    /// Whether the gateway now holds the desired registration.
    #[must_use]
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Updated { .. })
    }
}

/// What a disable run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisableOutcome {
    /// The registration was deactivated.
    Disabled { webhook_id: String },
    /// The flag was cleared but the gateway had no registration for the URL.
    NotRegistered,
    /// A failure was caught, logged and suppressed.
    Failed { message: String },
}

/// Reconciles the gateway's webhook registration with the stored settings.
///
/// Collaborators are injected: the gateway client, the settings store, a
/// host resolver (defaults to DNS) and an audit logger (defaults to tracing).
///
/// # Example
///
/// ```rust,ignore
/// use gateway_webhook_sync::{InMemoryConfigStore, LiveGatewayClient, WebhookReconciler};
///
/// let reconciler = WebhookReconciler::new(
///     "https://shop.example.com/razorpay/payment/webhook",
///     LiveGatewayClient::from_config(&config.gateway)?,
///     store,
/// );
///
/// // From the "settings saved" hook:
/// let outcome = reconciler.reconcile_saved().await;
/// ```
pub struct WebhookReconciler<G, S, R = SystemResolver, L = TracingAuditLogger> {
    target_url: String,
    gateway: G,
    store: S,
    resolver: R,
    audit: L,
    secrets: SecretGenerator,
}

impl<G: GatewayClient, S: ConfigStore> WebhookReconciler<G, S> {
    /// Create a reconciler for the webhook at `target_url`.
    #[must_use]
    pub fn new(target_url: impl Into<String>, gateway: G, store: S) -> Self {
        Self {
            target_url: target_url.into(),
            gateway,
            store,
            resolver: SystemResolver,
            audit: TracingAuditLogger,
            secrets: SecretGenerator::new(),
        }
    }
}

impl<G, S, R, L> WebhookReconciler<G, S, R, L> {
    /// Replace the host resolver.
    #[must_use]
    pub fn with_resolver<R2: HostResolver>(self, resolver: R2) -> WebhookReconciler<G, S, R2, L> {
        WebhookReconciler {
            target_url: self.target_url,
            gateway: self.gateway,
            store: self.store,
            resolver,
            audit: self.audit,
            secrets: self.secrets,
        }
    }

    /// Replace the audit logger.
    #[must_use]
    pub fn with_audit_logger<L2: SyncAuditLogger>(self, audit: L2) -> WebhookReconciler<G, S, R, L2> {
        WebhookReconciler {
            target_url: self.target_url,
            gateway: self.gateway,
            store: self.store,
            resolver: self.resolver,
            audit,
            secrets: self.secrets,
        }
    }

    /// The URL the gateway is asked to deliver to.
    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

impl<G, S, R, L> WebhookReconciler<G, S, R, L>
where
    G: GatewayClient,
    S: ConfigStore,
    R: HostResolver,
    L: SyncAuditLogger,
{
    /// Reconcile using the form already committed to the store.
    ///
    /// This is the entry point for the "settings saved" hook.
    pub async fn reconcile_saved(&self) -> ReconciliationOutcome {
        match SubmittedFields::from_store(&self.store).await {
            Ok(submitted) => self.reconcile(&submitted).await,
            Err(e) => self.failed(e).await,
        }
    }

    /// Reconcile the gateway registration with `submitted`.
    ///
    /// Never fails: errors are logged and reported as
    /// [`ReconciliationOutcome::Failed`].
    pub async fn reconcile(&self, submitted: &SubmittedFields) -> ReconciliationOutcome {
        match self.try_reconcile(submitted).await {
            Ok(outcome) => outcome,
            Err(e) => self.failed(e).await,
        }
    }

    /// Reconcile, surfacing the first error instead of logging it.
    pub async fn try_reconcile(&self, submitted: &SubmittedFields) -> Result<ReconciliationOutcome> {
        if !submitted.is_enable_present() {
            tracing::debug!(
                target: "webhook_sync::reconcile",
                "enable_webhook not submitted, nothing to reconcile"
            );
            return Ok(ReconciliationOutcome::Skipped {
                reason: SkipReason::EnableFlagMissing,
            });
        }

        if let HostCheck::Rejected(reason) = check_target(&self.resolver, &self.target_url).await {
            self.audit
                .log(SyncAuditEvent::TargetSkipped { reason: reason.to_string() })
                .await;
            return Ok(ReconciliationOutcome::Skipped { reason });
        }

        let existing = self.find_existing().await;
        let previously_active = existing
            .as_ref()
            .map(|w| w.active_events.clone())
            .unwrap_or_default();

        let events = merge_events(
            &submitted.webhook_events,
            &previously_active,
            &submitted.supported_webhook_events,
        );

        let secret = self.ensure_secret().await?;
        let payload = WebhookPayload::subscribe(self.target_url.as_str(), &events, secret);

        let outcome = match existing {
            Some(webhook) => {
                self.gateway.update_webhook(&payload, &webhook.id).await?;
                self.touch_triggered_at().await?;
                self.audit
                    .log(SyncAuditEvent::WebhookUpdated {
                        webhook_id: webhook.id.clone(),
                        url: self.target_url.clone(),
                    })
                    .await;
                ReconciliationOutcome::Updated { webhook_id: webhook.id, events }
            }
            None => {
                let created = self.gateway.create_webhook(&payload).await?;
                self.touch_triggered_at().await?;
                self.audit
                    .log(SyncAuditEvent::WebhookCreated {
                        webhook_id: created.id.clone(),
                        url: self.target_url.clone(),
                    })
                    .await;
                ReconciliationOutcome::Created { webhook_id: created.id, events }
            }
        };

        Ok(outcome)
    }

    /// Switch the webhook off: clear `enable_webhook` and deactivate the
    /// remote registration.
    ///
    /// Not part of [`reconcile`](Self::reconcile); callers invoke it
    /// explicitly. Never fails.
    pub async fn disable(&self) -> DisableOutcome {
        match self.try_disable().await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.raw_message();
                self.audit
                    .log(SyncAuditEvent::SyncFailed { kind: e.kind(), message: message.clone() })
                    .await;
                DisableOutcome::Failed { message }
            }
        }
    }

    /// Disable, surfacing the first error instead of logging it.
    pub async fn try_disable(&self) -> Result<DisableOutcome> {
        self.store.set(keys::ENABLE_WEBHOOK, "0").await?;

        let Some(webhook) = RemoteWebhookLookup::new(&self.gateway)
            .try_find_by_url(&self.target_url)
            .await?
        else {
            self.audit
                .log(SyncAuditEvent::WebhookNotRegistered { url: self.target_url.clone() })
                .await;
            return Ok(DisableOutcome::NotRegistered);
        };

        self.gateway
            .update_webhook(&WebhookPayload::deactivate(self.target_url.as_str()), &webhook.id)
            .await?;
        self.audit
            .log(SyncAuditEvent::WebhookDisabled { webhook_id: webhook.id.clone() })
            .await;

        Ok(DisableOutcome::Disabled { webhook_id: webhook.id })
    }

    /// Current stored settings, with the remote id looked up fresh.
    pub async fn current_config(&self) -> Result<WebhookConfig> {
        let mut config = WebhookConfig::load(&self.store, self.target_url.as_str()).await?;
        config.remote_id = RemoteWebhookLookup::new(&self.gateway)
            .try_find_by_url(&self.target_url)
            .await?
            .map(|w| w.id);
        Ok(config)
    }

    /// Registration for the target URL; listing errors count as none registered.
    async fn find_existing(&self) -> Option<ExistingWebhook> {
        match RemoteWebhookLookup::new(&self.gateway)
            .try_find_by_url(&self.target_url)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                self.audit
                    .log(SyncAuditEvent::LookupFailed { message: e.message().to_string() })
                    .await;
                None
            }
        }
    }

    /// Stored secret if there is one, otherwise a new one persisted first.
    async fn ensure_secret(&self) -> Result<String> {
        if let Some(secret) = self.store.get_non_empty(keys::WEBHOOK_SECRET).await? {
            self.audit.log(SyncAuditEvent::SecretReused).await;
            return Ok(secret);
        }

        let secret = self.secrets.generate();
        self.store.set(keys::WEBHOOK_SECRET, &secret).await?;
        self.audit.log(SyncAuditEvent::SecretCreated).await;
        Ok(secret)
    }

    async fn touch_triggered_at(&self) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.store
            .set(keys::WEBHOOK_TRIGGERED_AT, &now.to_string())
            .await
    }

    async fn failed(&self, error: crate::error::SyncError) -> ReconciliationOutcome {
        let message = error.raw_message();
        self.audit
            .log(SyncAuditEvent::SyncFailed { kind: error.kind(), message: message.clone() })
            .await;
        ReconciliationOutcome::Failed { message }
    }
}
