//! SignInHandler - Command handler for password sign-in.

use std::sync::Arc;

use crate::domain::foundation::Email;
use crate::domain::identity::{AuthError, PasswordHasher, Session, User};
use crate::ports::{SessionRepository, UserRepository};

use super::{issue_session, verify_password, IdentityPolicy};

/// Command to sign in with email and password.
#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub email: String,
    pub password: String,
}

/// Result of successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub user: User,
    pub session: Session,
}

/// Handler for password sign-in.
///
/// Unknown email, malformed email and wrong password all return
/// `InvalidCredential` after one full password verification. Existing
/// sessions are left alone.
pub struct SignInHandler {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    hasher: Arc<PasswordHasher>,
    policy: IdentityPolicy,
}

impl SignInHandler {
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

    pub async fn handle(&self, cmd: SignInCommand) -> Result<SignInResult, AuthError> {
        // 1. Look up the user, if the email is even well-formed
        let user = match Email::parse(&cmd.email) {
            Ok(email) => self.users.find_by_email(&email).await?,
            Err(_) => None,
        };

        // 2. Verify; runs against a dummy hash when the user is unknown
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let matches = verify_password(&self.hasher, cmd.password, stored).await?;

        let user = match (user, matches) {
            (Some(user), true) => user,
            _ => {
                tracing::info!("Sign-in rejected");
                return Err(AuthError::InvalidCredential);
            }
        };

        // 3. Issue a new session
        let session = issue_session(self.sessions.as_ref(), user.id, self.policy.session_ttl).await?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignInResult { user, session })
    }
}
