//! Test doubles for webhook reconciliation.
//!
//! Everything here is in-process: no network, no DNS.
//!
//! # Example
//!
//! ```rust,ignore
//! use gateway_webhook_sync::testing::{MockGatewayClient, RecordingAuditLogger, StaticResolver};
//! use gateway_webhook_sync::{InMemoryConfigStore, SubmittedFields, WebhookReconciler};
//!
//! #[tokio::test]
//! async fn creates_registration() {
//!     let gateway = MockGatewayClient::new();
//!     let reconciler = WebhookReconciler::new(URL, gateway.clone(), InMemoryConfigStore::new())
//!         .with_resolver(StaticResolver::new().with_host("shop.example.com", [52, 66, 10, 20].into()))
//!         .with_audit_logger(RecordingAuditLogger::new());
//!
//!     reconciler.reconcile(&SubmittedFields::new().enabled(true)).await;
//!     assert_eq!(gateway.create_calls().len(), 1);
//! }
//! ```

mod audit;
mod gateway;
mod resolver;

pub use audit::RecordingAuditLogger;
pub use gateway::{GatewayCall, MockGatewayClient};
pub use resolver::StaticResolver;
