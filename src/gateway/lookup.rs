//! Finding an existing registration by target URL.
//!
//! The gateway has no lookup-by-URL call, so the full listing is scanned
//! linearly. Accounts carry a handful of registrations at most.

use std::collections::BTreeSet;

use super::client::{GatewayClient, RemoteWebhookRecord};
use super::error::GatewayResult;

/// The registration found for a target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingWebhook {
    pub id: String,
    pub active_events: BTreeSet<String>,
}

impl From<&RemoteWebhookRecord> for ExistingWebhook {
    fn from(record: &RemoteWebhookRecord) -> Self {
        Self {
            id: record.id.clone(),
            active_events: record.active_events(),
        }
    }
}

/// Looks up webhook registrations through a [`GatewayClient`].
pub struct RemoteWebhookLookup<'a, G: GatewayClient> {
    client: &'a G,
}

impl<'a, G: GatewayClient> RemoteWebhookLookup<'a, G> {
    #[must_use]
    pub fn new(client: &'a G) -> Self {
        Self { client }
    }

    /// Find the registration whose URL equals `url`, surfacing API errors.
    pub async fn try_find_by_url(&self, url: &str) -> GatewayResult<Option<ExistingWebhook>> {
        if url.is_empty() {
            return Ok(None);
        }

        let listing = self.client.list_webhooks().await?;
        Ok(match_url(&listing.items, url))
    }

    /// Find the registration whose URL equals `url`.
    ///
    /// Any API error is logged and reported as "not found".
    pub async fn find_by_url(&self, url: &str) -> Option<ExistingWebhook> {
        match self.try_find_by_url(url).await {
            Ok(found) => found,
            Err(e) => {
                tracing::info!(
                    target: "webhook_sync::gateway",
                    error = %e,
                    "{}", e.message()
                );
                None
            }
        }
    }
}

/// First record whose URL is byte-for-byte equal to `url`.
#[must_use]
pub fn match_url(items: &[RemoteWebhookRecord], url: &str) -> Option<ExistingWebhook> {
    items
        .iter()
        .find(|record| record.url == url)
        .map(ExistingWebhook::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::testing::MockGatewayClient;
    use std::collections::BTreeMap;

    const URL: &str = "https://shop.example.com/razorpay/payment/webhook";

    fn record(id: &str, url: &str, events: &[(&str, bool)]) -> RemoteWebhookRecord {
        RemoteWebhookRecord {
            id: id.to_string(),
            url: url.to_string(),
            events: events
                .iter()
                .map(|(name, on)| (name.to_string(), *on))
                .collect::<BTreeMap<_, _>>(),
            active: true,
        }
    }

    #[test]
    fn test_match_url_first_match_wins() {
        let items = vec![
            record("wh_other", "https://other.example.com/hook", &[]),
            record("wh_first", URL, &[("payment.authorized", true)]),
            record("wh_second", URL, &[("order.paid", true)]),
        ];

        let found = match_url(&items, URL).unwrap();
        assert_eq!(found.id, "wh_first");
        assert_eq!(found.active_events, BTreeSet::from(["payment.authorized".to_string()]));
    }

    #[test]
    fn test_match_url_is_exact() {
        let items = vec![
            record("wh_slash", &format!("{}/", URL), &[]),
            record("wh_upper", &URL.to_uppercase(), &[]),
            record("wh_http", &URL.replace("https", "http"), &[]),
        ];

        assert!(match_url(&items, URL).is_none());
    }

    #[tokio::test]
    async fn test_find_by_url_collects_only_true_events() {
        let client = MockGatewayClient::new().with_webhook(record(
            "wh_1",
            URL,
            &[("payment.authorized", true), ("payment.failed", false), ("refund.created", true)],
        ));

        let found = RemoteWebhookLookup::new(&client).find_by_url(URL).await.unwrap();
        assert_eq!(found.id, "wh_1");
        assert_eq!(
            found.active_events,
            BTreeSet::from(["payment.authorized".to_string(), "refund.created".to_string()])
        );
    }

    #[tokio::test]
    async fn test_find_by_url_swallows_api_errors() {
        let client = MockGatewayClient::new()
            .with_webhook(record("wh_1", URL, &[]))
            .fail_list(GatewayError::Api {
                operation: "list_webhooks".to_string(),
                message: "Authentication failed".to_string(),
                code: Some("BAD_REQUEST_ERROR".to_string()),
                http_status: Some(401),
            });

        let lookup = RemoteWebhookLookup::new(&client);
        assert!(lookup.find_by_url(URL).await.is_none());
        assert!(lookup.try_find_by_url(URL).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_url_skips_listing() {
        let client = MockGatewayClient::new();

        assert!(RemoteWebhookLookup::new(&client).find_by_url("").await.is_none());
        assert!(client.calls().is_empty());
    }
}
