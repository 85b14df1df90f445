//! Live gateway client implementation.
//!
//! Talks to the gateway's REST webhook endpoints over HTTPS with basic auth,
//! bounded timeouts and retry with exponential backoff.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::client::{
    DEFAULT_BASE_URL, GatewayClient, RemoteWebhookRecord, WebhookList, WebhookPayload,
};
use super::error::{GatewayError, GatewayResult};
use crate::config::GatewayConfig;

/// Path of the webhook collection, relative to the API root.
const WEBHOOKS_PATH: &str = "webhooks";

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the live gateway client.
#[derive(Debug, Clone)]
pub struct LiveGatewayClientConfig {
    /// Maximum number of retry attempts for transient failures.
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LiveGatewayClientConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 250,
            max_delay_ms: 5_000,
            timeout_seconds: 10,
        }
    }
}

impl LiveGatewayClientConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set base delay for exponential backoff.
    #[must_use]
    pub fn base_delay_ms(mut self, ms: u64) -> Self {
        self.base_delay_ms = ms;
        self
    }

    /// Set maximum delay between retries.
    #[must_use]
    pub fn max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    /// Set request timeout.
    #[must_use]
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

// ============================================================================
// Credential Validation
// ============================================================================

fn validate_credentials(key_id: &str, key_secret: &str) -> GatewayResult<()> {
    if key_id.trim().is_empty() {
        return Err(GatewayError::InvalidCredentials {
            reason: "key id cannot be empty".to_string(),
        });
    }
    if key_secret.trim().is_empty() {
        return Err(GatewayError::InvalidCredentials {
            reason: "key secret cannot be empty".to_string(),
        });
    }
    if !key_id.starts_with("rzp_test_") && !key_id.starts_with("rzp_live_") {
        return Err(GatewayError::InvalidCredentials {
            reason: "key id must start with rzp_test_ or rzp_live_".to_string(),
        });
    }
    Ok(())
}

/// Webhook ids are interpolated into the request path, so only plain
/// alphanumeric ids (plus `_`) are accepted.
fn validate_webhook_id(id: &str) -> GatewayResult<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GatewayError::InvalidWebhookId { id: id.to_string() });
    }
    Ok(())
}

// ============================================================================
// Live Gateway Client
// ============================================================================

/// Live gateway client for production use.
///
/// # Example
///
/// ```rust,ignore
/// use gateway_webhook_sync::gateway::{LiveGatewayClient, LiveGatewayClientConfig};
///
/// let client = LiveGatewayClient::new(
///     "https://api.razorpay.com/v1",
///     "rzp_live_xxxxxxxx",
///     "key-secret".to_string(),
///     LiveGatewayClientConfig::default(),
/// )?;
/// ```
#[derive(Clone)]
pub struct LiveGatewayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: SecretString,
    config: LiveGatewayClientConfig,
}

impl LiveGatewayClient {
    /// Create a new live client.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are malformed or the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<SecretString>,
        config: LiveGatewayClientConfig,
    ) -> GatewayResult<Self> {
        let key_id = key_id.into();
        let key_secret: SecretString = key_secret.into();
        validate_credentials(&key_id, key_secret.expose_secret())?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("gateway-webhook-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Network {
                operation: "build_client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id,
            key_secret,
            config,
        })
    }

    /// Create a client from the crate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no key secret is configured or the credentials are malformed.
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let key_secret = config.key_secret.clone().ok_or_else(|| GatewayError::InvalidCredentials {
            reason: "key secret is not configured".to_string(),
        })?;

        Self::new(
            config.base_url.clone(),
            config.key_id.clone(),
            key_secret,
            LiveGatewayClientConfig::new()
                .max_retries(config.max_retries)
                .timeout_seconds(config.timeout_seconds),
        )
    }

    /// Check if the client is using test mode credentials.
    #[must_use]
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<&WebhookPayload>,
    ) -> GatewayResult<T> {
        let mut request = self
            .http
            .request(method, self.endpoint(path))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_transport_error(e, operation, self.config.timeout_seconds))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_api_error(operation, status.as_u16(), &body));
        }

        response.json::<T>().await.map_err(|e| GatewayError::InvalidResponse {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }
}

// Debug implementation that doesn't expose the key secret
impl std::fmt::Debug for LiveGatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveGatewayClient")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Retry Logic
// ============================================================================

/// Execute an idempotent operation with retry logic and timeout.
///
/// Retries on:
/// - HTTP 429 (Rate Limited)
/// - HTTP 5xx (Server Errors)
/// - Timeouts and connection failures
async fn with_retry<T, F, Fut>(
    config: &LiveGatewayClientConfig,
    operation: &str,
    operation_fn: F,
) -> GatewayResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = GatewayResult<T>>,
{
    let timeout_duration = Duration::from_secs(config.timeout_seconds);
    let mut attempts = 0;

    loop {
        let result = tokio::time::timeout(timeout_duration, operation_fn()).await;

        match result {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => {
                if !e.is_retryable() || attempts >= config.max_retries {
                    return Err(e);
                }

                log_retry(operation, attempts, &e, config);
                sleep_with_backoff(attempts, config).await;
                attempts += 1;
            }
            Err(_elapsed) => {
                if attempts >= config.max_retries {
                    return Err(GatewayError::Timeout {
                        operation: operation.to_string(),
                        seconds: config.timeout_seconds,
                    });
                }

                tracing::warn!(
                    target: "webhook_sync::gateway",
                    operation = operation,
                    attempt = attempts + 1,
                    timeout_seconds = config.timeout_seconds,
                    "Gateway request timed out, retrying"
                );

                sleep_with_backoff(attempts, config).await;
                attempts += 1;
            }
        }
    }
}

/// Execute a non-idempotent operation once, bounded by the configured timeout.
async fn with_timeout<T, Fut>(
    config: &LiveGatewayClientConfig,
    operation: &str,
    future: Fut,
) -> GatewayResult<T>
where
    Fut: std::future::Future<Output = GatewayResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(config.timeout_seconds), future).await {
        Ok(result) => result,
        Err(_elapsed) => Err(GatewayError::Timeout {
            operation: operation.to_string(),
            seconds: config.timeout_seconds,
        }),
    }
}

#[inline]
fn log_retry(operation: &str, attempts: u32, error: &GatewayError, config: &LiveGatewayClientConfig) {
    let delay = calculate_backoff_delay(attempts, config.base_delay_ms, config.max_delay_ms);
    tracing::warn!(
        target: "webhook_sync::gateway",
        operation = operation,
        attempt = attempts + 1,
        delay_ms = delay.as_millis() as u64,
        error = %error,
        "Retrying gateway call after transient error"
    );
}

#[inline]
async fn sleep_with_backoff(attempts: u32, config: &LiveGatewayClientConfig) {
    let delay = calculate_backoff_delay(attempts, config.base_delay_ms, config.max_delay_ms);
    tokio::time::sleep(delay).await;
}

/// Calculate backoff delay with exponential backoff and jitter.
#[inline]
fn calculate_backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    // Exponential backoff: base_ms * 2^attempt
    let delay_ms = base_ms.saturating_mul(2_u64.saturating_pow(attempt));
    let delay_ms = delay_ms.min(max_ms);

    // Add jitter (0-25% of delay)
    let jitter = if delay_ms > 0 {
        fastrand::u64(0..=delay_ms / 4)
    } else {
        0
    };
    Duration::from_millis(delay_ms.saturating_add(jitter))
}

// ============================================================================
// Error Mapping
// ============================================================================

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Map an error response body to a `GatewayError`.
///
/// The gateway reports `{"error": {"code": ..., "description": ...}}`; any
/// other body is passed through as the message.
fn map_api_error(operation: &str, http_status: u16, body: &str) -> GatewayError {
    let (message, code) = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope
                .error
                .description
                .unwrap_or_else(|| "Unknown error".to_string()),
            envelope.error.code,
        ),
        Err(_) if body.trim().is_empty() => (format!("HTTP {}", http_status), None),
        Err(_) => (body.trim().to_string(), None),
    };

    GatewayError::Api {
        operation: operation.to_string(),
        message,
        code,
        http_status: Some(http_status),
    }
}

fn map_transport_error(error: reqwest::Error, operation: &str, timeout_seconds: u64) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout {
            operation: operation.to_string(),
            seconds: timeout_seconds,
        }
    } else {
        GatewayError::Network {
            operation: operation.to_string(),
            message: error.to_string(),
        }
    }
}

// ============================================================================
// GatewayClient Implementation
// ============================================================================

impl GatewayClient for LiveGatewayClient {
    async fn list_webhooks(&self) -> GatewayResult<WebhookList> {
        with_retry(&self.config, "list_webhooks", move || {
            self.execute("list_webhooks", Method::GET, WEBHOOKS_PATH, None)
        })
        .await
    }

    async fn create_webhook(&self, payload: &WebhookPayload) -> GatewayResult<RemoteWebhookRecord> {
        // Not idempotent: sent once, never retried.
        with_timeout(
            &self.config,
            "create_webhook",
            self.execute("create_webhook", Method::POST, WEBHOOKS_PATH, Some(payload)),
        )
        .await
    }

    async fn update_webhook(
        &self,
        payload: &WebhookPayload,
        webhook_id: &str,
    ) -> GatewayResult<RemoteWebhookRecord> {
        validate_webhook_id(webhook_id)?;
        let path = format!("{}/{}", WEBHOOKS_PATH, webhook_id);
        let path = path.as_str();

        with_retry(&self.config, "update_webhook", move || {
            self.execute("update_webhook", Method::PUT, path, Some(payload))
        })
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LiveGatewayClient {
        LiveGatewayClient::new(
            DEFAULT_BASE_URL,
            "rzp_test_1234567890",
            "secret_value".to_string(),
            LiveGatewayClientConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("rzp_test_abc", "secret").is_ok());
        assert!(validate_credentials("rzp_live_abc", "secret").is_ok());
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("rzp_test_abc", "  ").is_err());
        assert!(validate_credentials("sk_test_abc", "secret").is_err());
    }

    #[test]
    fn test_validate_webhook_id() {
        assert!(validate_webhook_id("HXjZ0yJrNa1vfz").is_ok());
        assert!(validate_webhook_id("wh_mock_1").is_ok());
        assert!(validate_webhook_id("").is_err());
        assert!(validate_webhook_id("../accounts").is_err());
        assert!(validate_webhook_id("a b").is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = LiveGatewayClientConfig::new()
            .max_retries(5)
            .base_delay_ms(1000)
            .max_delay_ms(60_000)
            .timeout_seconds(60);

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.max_delay_ms, 60_000);
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn test_backoff_calculation() {
        let delay0 = calculate_backoff_delay(0, 500, 30_000);
        assert!(delay0.as_millis() >= 500 && delay0.as_millis() <= 625);

        let delay2 = calculate_backoff_delay(2, 500, 30_000);
        assert!(delay2.as_millis() >= 2000 && delay2.as_millis() <= 2500);

        let delay_high = calculate_backoff_delay(10, 500, 30_000);
        assert!(delay_high.as_millis() <= 30_000 + 7_500);

        assert_eq!(calculate_backoff_delay(0, 0, 1000).as_millis(), 0);
    }

    #[test]
    fn test_map_api_error_envelope() {
        let err = map_api_error(
            "create_webhook",
            400,
            r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"The url is invalid"}}"#,
        );

        assert_eq!(
            err,
            GatewayError::Api {
                operation: "create_webhook".to_string(),
                message: "The url is invalid".to_string(),
                code: Some("BAD_REQUEST_ERROR".to_string()),
                http_status: Some(400),
            }
        );
    }

    #[test]
    fn test_map_api_error_plain_body() {
        let err = map_api_error("list_webhooks", 502, "Bad Gateway");
        assert_eq!(err.message(), "Bad Gateway");

        let err = map_api_error("list_webhooks", 503, "");
        assert_eq!(err.message(), "HTTP 503");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = LiveGatewayClient::new(
            "https://api.example.com/v1/",
            "rzp_test_1234567890",
            "secret_value".to_string(),
            LiveGatewayClientConfig::default(),
        )
        .unwrap();

        assert_eq!(client.endpoint("webhooks"), "https://api.example.com/v1/webhooks");
        assert_eq!(client.endpoint("/webhooks/wh_1"), "https://api.example.com/v1/webhooks/wh_1");
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let debug_output = format!("{:?}", client());

        assert!(!debug_output.contains("secret_value"));
        assert!(debug_output.contains("rzp_test_1234567890"));
    }

    #[test]
    fn test_mode_detection() {
        assert!(client().is_test_mode());

        let live = LiveGatewayClient::new(
            DEFAULT_BASE_URL,
            "rzp_live_1234567890",
            "secret_value".to_string(),
            LiveGatewayClientConfig::default(),
        )
        .unwrap();
        assert!(!live.is_test_mode());
    }

    #[tokio::test]
    async fn test_update_rejects_unsafe_id_without_network() {
        let err = client()
            .update_webhook(&WebhookPayload::deactivate("https://a.example"), "../x")
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::InvalidWebhookId { .. }));
    }
}
