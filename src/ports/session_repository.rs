//! Session store port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::identity::{Session, SessionToken};

/// Repository port for bearer sessions.
///
/// Expired sessions are kept; callers check `Session::is_expired_at`.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    ///
    /// # Errors
    ///
    /// - `SessionTokenCollision` if the token already exists. A token is
    ///   never reassigned, so implementations must not overwrite.
    /// - `DatabaseError` on persistence failure
    async fn create(&self, session: &Session) -> Result<(), DomainError>;

    /// Find the session for a token, expired or not.
    async fn find_by_token(&self, token: &SessionToken) -> Result<Option<Session>, DomainError>;

    /// Delete the session for a token. Deleting a missing token succeeds.
    async fn delete_by_token(&self, token: &SessionToken) -> Result<(), DomainError>;
}
