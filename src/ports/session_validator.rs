//! Session validation port for bearer tokens.
//!
//! HTTP middleware uses this to turn an `Authorization: Bearer` token into
//! the authenticated caller.

use async_trait::async_trait;

use crate::domain::identity::{AuthError, AuthenticatedUser};

/// Validates session tokens and resolves the caller.
///
/// # Contract
///
/// - Unknown and expired tokens both return `AuthError::Unauthorized`
/// - Validation has no side effects (no rotation, no sliding expiry)
/// - Storage failures return `AuthError::Internal`
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Email, UserId};
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct TestSessionValidator {
        tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    }

    #[async_trait]
    impl SessionValidator for TestSessionValidator {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::Unauthorized)
        }
    }

    #[tokio::test]
    async fn trait_is_object_safe_and_resolves_known_tokens() {
        let user = AuthenticatedUser {
            id: UserId::new(),
            email: Email::parse("a@x.com").unwrap(),
            display_name: None,
        };
        let mut tokens = HashMap::new();
        tokens.insert("known".to_string(), user.clone());

        let validator: Box<dyn SessionValidator> = Box::new(TestSessionValidator {
            tokens: RwLock::new(tokens),
        });

        assert_eq!(validator.validate("known").await.unwrap(), user);
        assert_eq!(
            validator.validate("unknown").await.unwrap_err(),
            AuthError::Unauthorized
        );
    }
}
