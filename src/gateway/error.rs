//! Gateway-specific error types.
//!
//! Every call against the remote webhook API returns these, so the
//! reconciler can decide what to log and what to retry.

use std::fmt;

/// Errors from the payment gateway's webhook API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The API credentials are missing or malformed.
    InvalidCredentials { reason: String },
    /// A webhook id that cannot be addressed in a request path.
    InvalidWebhookId { id: String },

    /// The gateway answered with an error response.
    Api {
        operation: String,
        message: String,
        code: Option<String>,
        http_status: Option<u16>,
    },
    /// The request never produced a response (DNS, connect, TLS, reset).
    Network { operation: String, message: String },
    /// No response within the configured timeout.
    Timeout { operation: String, seconds: u64 },
    /// A response arrived but could not be decoded.
    InvalidResponse { operation: String, message: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials { reason } => {
                write!(f, "Invalid gateway credentials: {}", reason)
            }
            Self::InvalidWebhookId { id } => {
                write!(f, "Invalid webhook id: '{}'", id)
            }
            Self::Api { operation, message, code, http_status } => {
                write!(f, "Gateway API error during '{}': {}", operation, message)?;
                if let Some(code) = code {
                    write!(f, " (code: {})", code)?;
                }
                if let Some(status) = http_status {
                    write!(f, " [HTTP {}]", status)?;
                }
                Ok(())
            }
            Self::Network { operation, message } => {
                write!(f, "Network error during '{}': {}", operation, message)
            }
            Self::Timeout { operation, seconds } => {
                write!(f, "Gateway request '{}' timed out after {} seconds", operation, seconds)
            }
            Self::InvalidResponse { operation, message } => {
                write!(f, "Unreadable gateway response for '{}': {}", operation, message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

impl GatewayError {
    /// The message as reported by the gateway (or the transport), without context.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidCredentials { reason } => reason,
            Self::InvalidWebhookId { id } => id,
            Self::Api { message, .. }
            | Self::Network { message, .. }
            | Self::InvalidResponse { message, .. } => message,
            Self::Timeout { .. } => "request timed out",
        }
    }

    /// HTTP status reported by the gateway, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api { http_status, .. } => *http_status,
            Self::Timeout { .. } => Some(408),
            _ => None,
        }
    }

    /// Check if this is a client error (4xx or local validation).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidCredentials { .. } | Self::InvalidWebhookId { .. } => true,
            Self::Api { http_status, .. } => {
                matches!(http_status, Some(400..=499)) && *http_status != Some(429)
            }
            _ => false,
        }
    }

    /// Check if this is a server-side or transport error.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::InvalidResponse { .. } => true,
            Self::Api { http_status, .. } => matches!(http_status, Some(500..=599) | None),
            _ => false,
        }
    }

    /// Check if this error is worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Api { http_status, .. } => {
                // Rate limit (429) and server errors (5xx) are retryable
                matches!(http_status, Some(429) | Some(500..=599))
            }
            _ => false,
        }
    }
}

/// Result of a single gateway call.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> GatewayError {
        GatewayError::Api {
            operation: "list_webhooks".to_string(),
            message: "Something went wrong".to_string(),
            code: Some("SERVER_ERROR".to_string()),
            http_status: Some(status),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            api_error(502).to_string(),
            "Gateway API error during 'list_webhooks': Something went wrong (code: SERVER_ERROR) [HTTP 502]"
        );

        let err = GatewayError::Timeout {
            operation: "create_webhook".to_string(),
            seconds: 10,
        };
        assert_eq!(
            err.to_string(),
            "Gateway request 'create_webhook' timed out after 10 seconds"
        );
    }

    #[test]
    fn test_error_classification() {
        let err = api_error(400);
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(!err.is_retryable());

        let err = api_error(429);
        assert!(!err.is_client_error());
        assert!(err.is_retryable());

        let err = api_error(503);
        assert!(err.is_server_error());
        assert!(err.is_retryable());

        let err = GatewayError::InvalidWebhookId { id: "../x".to_string() };
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_message_is_raw() {
        assert_eq!(api_error(500).message(), "Something went wrong");
        assert_eq!(api_error(500).http_status(), Some(500));
    }
}
