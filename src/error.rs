use crate::gateway::GatewayError;

/// The main error type for webhook synchronisation
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration store error: {0}")]
    Store(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Where a failure came from, for logging.
///
/// Failures from the remote API are reported apart from everything else so
/// that operators can tell an outage from a local fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The gateway rejected the call or could not be reached.
    Gateway,
    /// Anything else: store failures, bad configuration, bugs.
    Unexpected,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway => write!(f, "gateway"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

impl SyncError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Classify this error for the swallow-and-log boundary.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Gateway(_) => FailureKind::Gateway,
            _ => FailureKind::Unexpected,
        }
    }

    /// The raw message to log, without the variant prefix for gateway errors.
    #[must_use]
    pub fn raw_message(&self) -> String {
        match self {
            Self::Gateway(err) => err.message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SyncError::bad_request("Invalid log level: loud").to_string(),
            "Bad request: Invalid log level: loud"
        );
        assert_eq!(
            SyncError::store("disk full").to_string(),
            "Configuration store error: disk full"
        );
    }

    #[test]
    fn test_gateway_errors_are_classified() {
        let err: SyncError = GatewayError::Api {
            operation: "create_webhook".to_string(),
            message: "The url field is invalid".to_string(),
            code: Some("BAD_REQUEST_ERROR".to_string()),
            http_status: Some(400),
        }
        .into();

        assert_eq!(err.kind(), FailureKind::Gateway);
        assert_eq!(err.raw_message(), "The url field is invalid");
    }

    #[test]
    fn test_other_errors_are_unexpected() {
        let err = SyncError::store("disk full");
        assert_eq!(err.kind(), FailureKind::Unexpected);
        assert_eq!(err.raw_message(), "Configuration store error: disk full");
    }
}
