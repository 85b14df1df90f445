//! Gateway webhook sync - keep a payment gateway's webhook registration in
//! step with the shop's payment settings
//!
//! When an admin saves the payment settings, the shop has to tell the
//! gateway where to deliver events, which events it wants, and which secret
//! signs them. This crate does that reconciliation and never lets a gateway
//! failure break the save.
//!
//! # Features
//!
//! - **Reconciliation**: create or update the registration for the shop URL
//! - **Event merging**: keeps previously active events that are still supported
//! - **Secrets**: generates and persists a signing secret on first use
//! - **Reachability**: skips shops served from private or reserved addresses
//! - **Live client**: HTTPS client with timeouts and retry (`live-client` feature)
//! - **Testing**: in-memory gateway, resolver and audit doubles
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gateway_webhook_sync::{ConfigBuilder, JsonFileConfigStore, LiveGatewayClient, WebhookReconciler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     gateway_webhook_sync::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build()?;
//!     let reconciler = WebhookReconciler::new(
//!         config.webhook_url(),
//!         LiveGatewayClient::from_config(&config.gateway)?,
//!         JsonFileConfigStore::new("settings.json"),
//!     );
//!
//!     let outcome = reconciler.reconcile_saved().await;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

#![allow(async_fn_in_trait)] // async_trait macro handles Send/Sync bounds properly

pub mod config;
mod error;
pub mod gateway;
pub mod store;
pub mod testing;
pub mod utils;
pub mod webhook;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, GatewayConfig, LoggingConfig, WebhookTargetConfig};
pub use error::{FailureKind, Result, SyncError};
pub use gateway::{
    ExistingWebhook, GatewayClient, GatewayError, GatewayResult, RemoteWebhookLookup,
    RemoteWebhookRecord, WebhookList, WebhookPayload,
};
#[cfg(feature = "live-client")]
pub use gateway::{LiveGatewayClient, LiveGatewayClientConfig};
pub use store::{ConfigStore, ConfigStoreExt, InMemoryConfigStore, JsonFileConfigStore};
pub use webhook::{
    DisableOutcome, HostResolver, NoOpAuditLogger, ReconciliationOutcome, SecretGenerator,
    SkipReason, SubmittedFields, SyncAuditEvent, SyncAuditLogger, SystemResolver,
    TracingAuditLogger, WebhookConfig, WebhookReconciler,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "webhook_sync=debug")
/// - `WEBHOOK_SYNC_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("WEBHOOK_SYNC_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    init_subscriber(env_filter, json_logs);
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    init_subscriber(EnvFilter::new(&config.logging.level), config.logging.json);
}

fn init_subscriber(env_filter: EnvFilter, json: bool) {
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
