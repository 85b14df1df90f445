//! Payment gateway webhook API.
//!
//! Provides the [`GatewayClient`] trait the reconciler talks through, the
//! wire types of the webhook endpoints, a live HTTP client, and the
//! URL-based lookup of existing registrations.
//!
//! # Features
//!
//! - `live-client` - Enables [`LiveGatewayClient`] (on by default)

pub mod client;
pub mod error;
#[cfg(feature = "live-client")]
pub mod live_client;
pub mod lookup;

pub use client::{DEFAULT_BASE_URL, GatewayClient, RemoteWebhookRecord, WebhookList, WebhookPayload};
pub use error::{GatewayError, GatewayResult};
#[cfg(feature = "live-client")]
pub use live_client::{LiveGatewayClient, LiveGatewayClientConfig};
pub use lookup::{ExistingWebhook, RemoteWebhookLookup, match_url};
