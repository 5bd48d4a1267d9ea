//! In-memory session store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::identity::{Session, SessionToken};
use crate::ports::SessionRepository;

/// In-memory sessions keyed by token.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored sessions, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.token) {
            return Err(DomainError::new(
                ErrorCode::SessionTokenCollision,
                "Session token already exists",
            ));
        }
        sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &SessionToken) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn delete_by_token(&self, token: &SessionToken) -> Result<(), DomainError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};
    use chrono::Duration;

    #[tokio::test]
    async fn token_is_never_reassigned() {
        let repo = InMemorySessionRepository::new();
        let original =
            Session::issue(UserId::new(), Duration::days(1), Timestamp::now()).unwrap();
        repo.create(&original).await.unwrap();

        let hijack = Session {
            user_id: UserId::new(),
            ..original.clone()
        };
        let err = repo.create(&hijack).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::SessionTokenCollision);
        let stored = repo.find_by_token(&original.token).await.unwrap().unwrap();
        assert_eq!(stored.user_id, original.user_id);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemorySessionRepository::new();
        let session =
            Session::issue(UserId::new(), Duration::days(1), Timestamp::now()).unwrap();
        repo.create(&session).await.unwrap();

        repo.delete_by_token(&session.token).await.unwrap();
        repo.delete_by_token(&session.token).await.unwrap();

        assert_eq!(repo.session_count().await, 0);
    }
}
