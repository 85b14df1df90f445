//! Webhook reconciliation on admin settings save.
//!
//! When an admin saves the payment settings, [`WebhookReconciler`] makes the
//! gateway's webhook registration for this shop match the form: it checks
//! the shop is publicly reachable, finds any existing registration by URL,
//! merges the event subscriptions, makes sure a signing secret exists and
//! then updates or creates the registration.

mod audit;
mod fields;
mod host;
mod reconciler;
mod secret;

pub use audit::{NoOpAuditLogger, SyncAuditEvent, SyncAuditLogger, TracingAuditLogger};
pub use fields::{SubmittedFields, WebhookConfig, merge_events};
pub use host::{HostCheck, HostResolver, SkipReason, SystemResolver, check_target, is_public_ipv4};
pub use reconciler::{DisableOutcome, ReconciliationOutcome, WebhookReconciler};
pub use secret::{MAX_LENGTH as SECRET_MAX_LENGTH, MIN_LENGTH as SECRET_MIN_LENGTH, SecretGenerator, satisfies_policy};
