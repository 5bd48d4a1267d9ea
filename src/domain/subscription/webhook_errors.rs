//! Webhook error types for payment-provider event ingestion.
//!
//! Status codes drive the provider's redelivery: 2xx stops it, 4xx stops
//! it as well, 5xx makes it retry.

use http::StatusCode;
use thiserror::Error;

/// Errors that reject a webhook delivery.
///
/// Unknown users, unknown event types and stale events are not errors;
/// they are acknowledged no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// A secret is configured but the request carried no signature header.
    #[error("Missing signature")]
    MissingSignature,

    /// The signature header could not be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedSignature(String),

    /// No supplied signature matches the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signature timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// The verified body is not a usable event envelope.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Storage failed while applying the transition.
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl WebhookError {
    /// Returns true if the request failed authentication.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSignature
                | WebhookError::MalformedSignature(_)
                | WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
        )
    }

    /// Maps the error to the HTTP status returned to the provider.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::MalformedSignature(_)
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::MalformedEvent(_) => StatusCode::UNAUTHORIZED,

            WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::MalformedSignature(_) => "MALFORMED_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::TimestampOutOfRange => "TIMESTAMP_OUT_OF_RANGE",
            WebhookError::InvalidTimestamp => "INVALID_TIMESTAMP",
            WebhookError::MalformedEvent(_) => "MALFORMED_EVENT",
            WebhookError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_failures_are_401() {
        for err in [
            WebhookError::MissingSignature,
            WebhookError::MalformedSignature("x".into()),
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert!(err.is_authentication_failure());
        }
    }

    #[test]
    fn unreadable_events_are_rejected_like_bad_signatures() {
        for err in [
            WebhookError::MalformedEvent("not json".into()),
            WebhookError::InvalidTimestamp,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert!(!err.is_authentication_failure());
        }
    }

    #[test]
    fn internal_failure_is_500() {
        let err = WebhookError::Internal("db down".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_messages() {
        assert_eq!(WebhookError::InvalidSignature.to_string(), "Invalid signature");
        assert_eq!(
            WebhookError::MalformedEvent("bad".into()).to_string(),
            "Malformed event: bad"
        );
    }
}
