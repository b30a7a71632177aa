use thiserror::Error;

/// Errors returned by x402 operations.
#[derive(Debug, Error)]
pub enum X402Error {
    #[error("signature error: {0}")]
    SignatureError(String),

    #[error("invalid payment: {0}")]
    InvalidPayment(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("config error: {0}")]
    ConfigError(String),

    /// Transport-level failure before any HTTP response was obtained.
    /// Kept distinct from [`X402Error::HttpError`] so callers can tell a
    /// dead server apart from a protocol-level failure.
    #[error("connection failed: {0}")]
    ConnectionError(String),

    #[error("http error: {0}")]
    HttpError(String),

    /// Terminal payment failure: the server answered 402 again after the
    /// signed retry. Carries the facilitator's stated reason when present.
    #[error("payment rejected: {}", reason.as_deref().unwrap_or("no reason given"))]
    PaymentRejected { reason: Option<String> },

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_rejected_display_includes_reason() {
        let err = X402Error::PaymentRejected {
            reason: Some("insufficient funds".to_string()),
        };
        assert_eq!(err.to_string(), "payment rejected: insufficient funds");
    }

    #[test]
    fn test_payment_rejected_display_without_reason() {
        let err = X402Error::PaymentRejected { reason: None };
        assert_eq!(err.to_string(), "payment rejected: no reason given");
    }

    #[test]
    fn test_connection_error_mentions_connection() {
        let err = X402Error::ConnectionError("dns failure".to_string());
        assert!(err.to_string().contains("connection failed"));
        assert!(err.to_string().contains("dns failure"));
    }
}
