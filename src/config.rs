use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SyncError};
use crate::gateway::DEFAULT_BASE_URL;
use crate::utils::get_env_with_prefix;

/// Relative path the shop serves gateway webhooks on.
pub const DEFAULT_WEBHOOK_PATH: &str = "razorpay/payment/webhook";

/// Main configuration for webhook synchronisation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub webhook: WebhookTargetConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Gateway API access.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub key_id: String,
    /// Never serialized; only read from the environment or set in code.
    #[serde(skip)]
    pub key_secret: Option<SecretString>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Where the shop receives webhooks.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookTargetConfig {
    /// Public base URL of the shop, e.g. `https://shop.example.com/`.
    #[serde(default)]
    pub shop_base_url: String,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key_id: String::new(),
            key_secret: None,
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for WebhookTargetConfig {
    fn default() -> Self {
        Self {
            shop_base_url: String::new(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_webhook_path() -> String {
    DEFAULT_WEBHOOK_PATH.to_string()
}

impl WebhookTargetConfig {
    /// The absolute URL registered with the gateway.
    ///
    /// Joins the base URL and path with exactly one `/` between them.
    #[must_use]
    pub fn webhook_url(&self) -> String {
        format!(
            "{}/{}",
            self.shop_base_url.trim_end_matches('/'),
            self.webhook_path.trim_start_matches('/')
        )
    }
}

impl Config {
    /// Shortcut for [`WebhookTargetConfig::webhook_url`].
    #[must_use]
    pub fn webhook_url(&self) -> String {
        self.webhook.webhook_url()
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    pub fn with_gateway_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.gateway.base_url = base_url.into();
        self
    }

    /// Set the API key pair.
    pub fn with_credentials(mut self, key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        self.config.gateway.key_id = key_id.into();
        self.config.gateway.key_secret = Some(SecretString::from(key_secret.into()));
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.config.gateway.timeout_seconds = seconds;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.config.gateway.max_retries = retries;
        self
    }

    pub fn with_shop_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook.shop_base_url = url.into();
        self
    }

    pub fn with_webhook_path(mut self, path: impl Into<String>) -> Self {
        self.config.webhook.webhook_path = path.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// Every key is read as `WEBHOOK_SYNC_{KEY}` first, then `{KEY}`.
    /// Unparseable numbers keep the current value.
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }

        if let Some(base_url) = get_env_with_prefix("GATEWAY_BASE_URL") {
            self.config.gateway.base_url = base_url;
        }
        if let Some(key_id) = get_env_with_prefix("GATEWAY_KEY_ID") {
            self.config.gateway.key_id = key_id;
        }
        if let Some(secret) = get_env_with_prefix("GATEWAY_KEY_SECRET") {
            self.config.gateway.key_secret = Some(SecretString::from(secret));
        }
        if let Some(timeout) = get_env_with_prefix("GATEWAY_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse() {
                self.config.gateway.timeout_seconds = seconds;
            }
        }
        if let Some(retries) = get_env_with_prefix("GATEWAY_MAX_RETRIES") {
            if let Ok(retries) = retries.parse() {
                self.config.gateway.max_retries = retries;
            }
        }

        if let Some(base_url) = get_env_with_prefix("SHOP_BASE_URL") {
            self.config.webhook.shop_base_url = base_url;
        }
        if let Some(path) = get_env_with_prefix("WEBHOOK_PATH") {
            self.config.webhook.webhook_path = path;
        }

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration is invalid:
    /// - Invalid log level
    /// - Gateway base URL that is not an absolute http(s) URL
    /// - Zero timeout
    /// - Shop base URL that is set but does not parse
    ///
    /// Missing credentials are not an error here; the live client checks
    /// them when it is built.
    pub fn build(self) -> Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(SyncError::bad_request(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        match Url::parse(&self.config.gateway.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(SyncError::bad_request(format!(
                    "Invalid gateway base URL: {}",
                    self.config.gateway.base_url
                )));
            }
        }

        if self.config.gateway.timeout_seconds == 0 {
            return Err(SyncError::bad_request(
                "Gateway timeout must be greater than 0",
            ));
        }

        if !self.config.webhook.shop_base_url.is_empty() {
            Url::parse(&self.config.webhook.shop_base_url).map_err(|e| {
                SyncError::bad_request(format!(
                    "Invalid shop base URL {} - {}",
                    self.config.webhook.shop_base_url, e
                ))
            })?;
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let config = ConfigBuilder::new().build().unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gateway.timeout_seconds, 10);
        assert_eq!(config.webhook.webhook_path, DEFAULT_WEBHOOK_PATH);
        assert!(config.gateway.key_secret.is_none());
    }

    #[test]
    fn test_webhook_url_joins_with_single_slash() {
        let config = ConfigBuilder::new()
            .with_shop_base_url("https://shop.example.com/")
            .build()
            .unwrap();
        assert_eq!(
            config.webhook_url(),
            "https://shop.example.com/razorpay/payment/webhook"
        );

        let config = ConfigBuilder::new()
            .with_shop_base_url("https://shop.example.com/store")
            .with_webhook_path("/hooks/gateway")
            .build()
            .unwrap();
        assert_eq!(config.webhook_url(), "https://shop.example.com/store/hooks/gateway");
    }

    #[test]
    fn test_validation() {
        assert!(ConfigBuilder::new().with_log_level("loud").build().is_err());
        assert!(ConfigBuilder::new().with_timeout_seconds(0).build().is_err());
        assert!(ConfigBuilder::new().with_gateway_base_url("ftp://x").build().is_err());
        assert!(ConfigBuilder::new().with_shop_base_url("not a url").build().is_err());
    }

    #[test]
    fn test_credentials_are_not_serialized() {
        let config = ConfigBuilder::new()
            .with_credentials("rzp_test_abc", "hunter2")
            .build()
            .unwrap();

        assert_eq!(
            config.gateway.key_secret.as_ref().map(|s| s.expose_secret().to_string()),
            Some("hunter2".to_string())
        );
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_from_env() {
        unsafe {
            std::env::set_var("WEBHOOK_SYNC_SHOP_BASE_URL", "https://env.example.com");
            std::env::set_var("WEBHOOK_SYNC_GATEWAY_MAX_RETRIES", "5");
            std::env::set_var("WEBHOOK_SYNC_GATEWAY_TIMEOUT_SECONDS", "soon");
        }

        let config = ConfigBuilder::new().from_env().build().unwrap();
        assert_eq!(config.webhook.shop_base_url, "https://env.example.com");
        assert_eq!(config.gateway.max_retries, 5);
        assert_eq!(config.gateway.timeout_seconds, 10);

        unsafe {
            std::env::remove_var("WEBHOOK_SYNC_SHOP_BASE_URL");
            std::env::remove_var("WEBHOOK_SYNC_GATEWAY_MAX_RETRIES");
            std::env::remove_var("WEBHOOK_SYNC_GATEWAY_TIMEOUT_SECONDS");
        }
    }
}
