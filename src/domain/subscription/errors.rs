//! Subscription-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised by ledger reads, manual activation and reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The target user does not exist.
    #[error("Couldn't sync your subscription, please contact support")]
    UserNotFound,

    /// No valid session.
    #[error("Invalid or expired session")]
    Unauthorized,

    /// Manual activation for someone else's email.
    #[error("Manual activation is only allowed for your own account")]
    Forbidden,

    /// Too many manual activations.
    #[error("Too many activation attempts, retry in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Storage failure.
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl SubscriptionError {
    pub fn internal(message: impl Into<String>) -> Self {
        SubscriptionError::Internal(message.into())
    }
}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::UserNotFound => SubscriptionError::UserNotFound,
            _ => SubscriptionError::Internal(err.to_string()),
        }
    }
}
