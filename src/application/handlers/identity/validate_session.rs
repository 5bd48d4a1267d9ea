//! ValidateSessionHandler - Query handler resolving a token to its user.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;
use crate::domain::identity::{AuthError, AuthenticatedUser, SessionToken, User};
use crate::ports::{SessionRepository, SessionValidator, UserRepository};

/// Query to resolve a session token.
#[derive(Debug, Clone)]
pub struct ValidateSessionQuery {
    pub token: SessionToken,
}

/// Handler for session validation.
///
/// Returns `None` for unknown tokens, expired sessions, and sessions whose
/// user no longer exists. Never mutates anything.
pub struct ValidateSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserRepository>,
}

impl ValidateSessionHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { sessions, users }
    }

    pub async fn handle(&self, query: ValidateSessionQuery) -> Result<Option<User>, AuthError> {
        let session = match self.sessions.find_by_token(&query.token).await? {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired_at(&Timestamp::now()) {
            tracing::debug!(user_id = %session.user_id, "Rejected expired session");
            return Ok(None);
        }

        Ok(self.users.find_by_id(&session.user_id).await?)
    }
}

#[async_trait]
impl SessionValidator for ValidateSessionHandler {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let query = ValidateSessionQuery {
            token: SessionToken::from_string(token),
        };
        self.handle(query)
            .await?
            .map(|user| AuthenticatedUser::from(&user))
            .ok_or(AuthError::Unauthorized)
    }
}
