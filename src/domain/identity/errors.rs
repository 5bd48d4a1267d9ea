//! Identity error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidCredential | 401 |
//! | Unauthorized | 401 |
//! | Conflict | 409 |
//! | Validation | 400 |
//! | Internal | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors surfaced by the session manager.
///
/// `InvalidCredential` is deliberately a unit variant: unknown email and
/// wrong password must be indistinguishable to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Sign-in failed. Same shape for unknown email and bad password.
    #[error("Invalid email or password")]
    InvalidCredential,

    /// Missing, unknown or expired session token.
    #[error("Invalid or expired session")]
    Unauthorized,

    /// The email is already registered to another user.
    #[error("Email is already in use")]
    Conflict,

    /// Input failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Storage or cryptography failure.
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(message: impl Into<String>) -> Self {
        AuthError::Internal(message.into())
    }

    /// Returns true if the caller should be sent back to sign-in.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::Unauthorized)
    }
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::EmailTaken => AuthError::Conflict,
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credential_message_does_not_reveal_which_part_failed() {
        assert_eq!(
            AuthError::InvalidCredential.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn email_taken_maps_to_conflict() {
        let err: AuthError = DomainError::new(ErrorCode::EmailTaken, "taken").into();
        assert_eq!(err, AuthError::Conflict);
    }

    #[test]
    fn database_error_maps_to_internal() {
        let err: AuthError = DomainError::database("boom").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn only_unauthorized_requires_reauthentication() {
        assert!(AuthError::Unauthorized.requires_reauthentication());
        assert!(!AuthError::InvalidCredential.requires_reauthentication());
        assert!(!AuthError::Conflict.requires_reauthentication());
    }
}
