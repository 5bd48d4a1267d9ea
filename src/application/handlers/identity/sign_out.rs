//! SignOutHandler - Command handler for revoking a session.

use std::sync::Arc;

use crate::domain::identity::{AuthError, SessionToken};
use crate::ports::SessionRepository;

/// Command to revoke a session.
#[derive(Debug, Clone)]
pub struct SignOutCommand {
    pub token: SessionToken,
}

/// Handler for sign-out. Idempotent: revoking an unknown token succeeds.
pub struct SignOutHandler {
    sessions: Arc<dyn SessionRepository>,
}

impl SignOutHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, cmd: SignOutCommand) -> Result<(), AuthError> {
        self.sessions.delete_by_token(&cmd.token).await?;
        tracing::debug!("Session revoked");
        Ok(())
    }
}
