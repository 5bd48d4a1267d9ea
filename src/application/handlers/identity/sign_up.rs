//! SignUpHandler - Command handler for registering a new account.

use std::sync::Arc;

use crate::domain::foundation::{Email, Timestamp, ValidationError};
use crate::domain::identity::{AuthError, PasswordHasher, Session, User};
use crate::ports::{SessionRepository, UserRepository};

use super::{hash_password, issue_session, IdentityPolicy};

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct SignUpCommand {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Result of successful sign-up.
#[derive(Debug, Clone)]
pub struct SignUpResult {
    pub user: User,
    pub session: Session,
}

/// Handler for account registration.
///
/// Creates the user with subscription status `none` and signs them in.
pub struct SignUpHandler {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    hasher: Arc<PasswordHasher>,
    policy: IdentityPolicy,
}

impl SignUpHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        hasher: Arc<PasswordHasher>,
        policy: IdentityPolicy,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            policy,
        }
    }

    pub async fn handle(&self, cmd: SignUpCommand) -> Result<SignUpResult, AuthError> {
        // 1. Validate input
        let email = Email::parse(&cmd.email)?;
        if cmd.password.chars().count() < self.policy.password_min_length {
            return Err(ValidationError::too_short("password", self.policy.password_min_length).into());
        }

        // 2. Reject duplicates before paying for a hash
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        // 3. Create the user; the store enforces uniqueness under races
        let password_hash = hash_password(&self.hasher, cmd.password).await?;
        let user = User::register(email, cmd.name, password_hash, Timestamp::now());
        self.users.create(&user).await?;

        // 4. Sign in
        let session = issue_session(self.sessions.as_ref(), user.id, self.policy.session_ttl).await?;

        tracing::info!(user_id = %user.id, "User signed up");

        Ok(SignUpResult { user, session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::identity::test_support::{fast_hasher, policy, stores};
    use crate::domain::subscription::SubscriptionStatus;
    use crate::ports::SubscriptionLedger;

    fn cmd(email: &str, password: &str) -> SignUpCommand {
        SignUpCommand {
            email: email.to_string(),
            password: password.to_string(),
            name: Some("Ada".to_string()),
        }
    }

    #[tokio::test]
    async fn sign_up_creates_user_and_session() {
        let (accounts, sessions) = stores();
        let handler = SignUpHandler::new(accounts.clone(), sessions.clone(), fast_hasher(), policy());

        let result = handler.handle(cmd("Ada@Example.com", "correct horse")).await.unwrap();

        assert_eq!(result.user.email.as_str(), "ada@example.com");
        assert_eq!(result.session.user_id, result.user.id);
        assert!(sessions
            .find_by_token(&result.session.token)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn new_account_starts_unsubscribed() {
        let (accounts, sessions) = stores();
        let handler = SignUpHandler::new(accounts.clone(), sessions, fast_hasher(), policy());

        let result = handler.handle(cmd("a@x.com", "password1")).await.unwrap();
        let state = accounts.find_by_user(&result.user.id).await.unwrap().unwrap();

        assert_eq!(state.status, SubscriptionStatus::None);
        assert_eq!(state.expires_at, None);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict_case_insensitively() {
        let (accounts, sessions) = stores();
        let handler = SignUpHandler::new(accounts, sessions, fast_hasher(), policy());

        handler.handle(cmd("a@x.com", "password1")).await.unwrap();
        let err = handler.handle(cmd("A@X.COM", "password2")).await.unwrap_err();

        assert_eq!(err, AuthError::Conflict);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (accounts, sessions) = stores();
        let handler = SignUpHandler::new(accounts, sessions, fast_hasher(), policy());

        let err = handler.handle(cmd("a@x.com", "short")).await.unwrap_err();

        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::TooShort { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let (accounts, sessions) = stores();
        let handler = SignUpHandler::new(accounts, sessions, fast_hasher(), policy());

        let err = handler.handle(cmd("no-at-sign", "password1")).await.unwrap_err();

        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn stored_verifier_is_not_the_password() {
        let (accounts, sessions) = stores();
        let handler = SignUpHandler::new(accounts.clone(), sessions, fast_hasher(), policy());

        let result = handler.handle(cmd("a@x.com", "password1")).await.unwrap();
        let stored = accounts.find_by_id(&result.user.id).await.unwrap().unwrap();

        assert_ne!(stored.password_hash.as_str(), "password1");
        assert!(stored.password_hash.as_str().starts_with("$argon2id$"));
    }
}
