//! Audit logging for webhook reconciliation.
//!
//! Every branch the reconciler takes is reported as a [`SyncAuditEvent`],
//! so admins can see in the logs why a save did or did not touch the
//! gateway.

use std::fmt;

use crate::error::FailureKind;

/// Audit event types for webhook reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAuditEvent {
    /// Target host was not eligible; nothing was sent.
    TargetSkipped { reason: String },
    /// Listing the existing registrations failed; treated as none registered.
    LookupFailed { message: String },
    /// The stored secret was reused.
    SecretReused,
    /// A new secret was generated and stored.
    SecretCreated,
    /// A registration was created.
    WebhookCreated { webhook_id: String, url: String },
    /// An existing registration was updated.
    WebhookUpdated { webhook_id: String, url: String },
    /// A registration was deactivated.
    WebhookDisabled { webhook_id: String },
    /// Disabling found no registration for the URL.
    WebhookNotRegistered { url: String },
    /// A failure was caught and suppressed.
    SyncFailed { kind: FailureKind, message: String },
}

impl fmt::Display for SyncAuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetSkipped { reason } => {
                write!(f, "Can't enable/disable webhook: {}", reason)
            }
            Self::LookupFailed { message } => write!(f, "{}", message),
            Self::SecretReused => write!(f, "Webhook with existing secret"),
            Self::SecretCreated => write!(f, "Webhook created new secret"),
            Self::WebhookCreated { webhook_id, url } => {
                write!(f, "Webhook created by admin: id={}, url={}", webhook_id, url)
            }
            Self::WebhookUpdated { webhook_id, url } => {
                write!(f, "Webhook updated by admin: id={}, url={}", webhook_id, url)
            }
            Self::WebhookDisabled { webhook_id } => {
                write!(f, "Webhook disabled by admin: id={}", webhook_id)
            }
            Self::WebhookNotRegistered { url } => {
                write!(f, "No webhook registered for {}", url)
            }
            Self::SyncFailed { message, .. } => write!(f, "{}", message),
        }
    }
}

/// Trait for audit logging backends.
///
/// Implementations must not fail; reconciliation never waits on them for
/// anything but completion.
#[allow(async_fn_in_trait)]
pub trait SyncAuditLogger: Send + Sync {
    /// Log a reconciliation audit event.
    async fn log(&self, event: SyncAuditEvent);
}

/// No-op audit logger that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAuditLogger;

impl SyncAuditLogger for NoOpAuditLogger {
    async fn log(&self, _event: SyncAuditEvent) {}
}

/// Tracing-based audit logger.
///
/// Logs audit events using the `tracing` crate at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

impl SyncAuditLogger for TracingAuditLogger {
    async fn log(&self, event: SyncAuditEvent) {
        match &event {
            SyncAuditEvent::SyncFailed { kind, .. } => tracing::info!(
                target: "webhook_sync::audit",
                event_type = %event_kind(&event),
                failure = %kind,
                "{}", event
            ),
            _ => tracing::info!(
                target: "webhook_sync::audit",
                event_type = %event_kind(&event),
                "{}", event
            ),
        }
    }
}

/// Get the event kind as a string for structured logging.
pub(crate) fn event_kind(event: &SyncAuditEvent) -> &'static str {
    match event {
        SyncAuditEvent::TargetSkipped { .. } => "target_skipped",
        SyncAuditEvent::LookupFailed { .. } => "lookup_failed",
        SyncAuditEvent::SecretReused => "secret_reused",
        SyncAuditEvent::SecretCreated => "secret_created",
        SyncAuditEvent::WebhookCreated { .. } => "webhook_created",
        SyncAuditEvent::WebhookUpdated { .. } => "webhook_updated",
        SyncAuditEvent::WebhookDisabled { .. } => "webhook_disabled",
        SyncAuditEvent::WebhookNotRegistered { .. } => "webhook_not_registered",
        SyncAuditEvent::SyncFailed { .. } => "sync_failed",
    }
}
