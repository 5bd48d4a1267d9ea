//! UpdateProfileHandler - Command handler for changing name or email.

use std::sync::Arc;

use crate::domain::foundation::Email;
use crate::domain::identity::{AuthError, SessionToken, User};
use crate::ports::UserRepository;

use super::{ValidateSessionHandler, ValidateSessionQuery};

/// Command to update the caller's profile.
///
/// Absent fields are left unchanged. A blank name clears it.
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub token: SessionToken,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Handler for profile updates. Requires a valid session.
pub struct UpdateProfileHandler {
    sessions: Arc<ValidateSessionHandler>,
    users: Arc<dyn UserRepository>,
}

impl UpdateProfileHandler {
    pub fn new(sessions: Arc<ValidateSessionHandler>, users: Arc<dyn UserRepository>) -> Self {
        Self { sessions, users }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<User, AuthError> {
        // 1. Authenticate
        let mut user = self
            .sessions
            .handle(ValidateSessionQuery { token: cmd.token })
            .await?
            .ok_or(AuthError::Unauthorized)?;

        // 2. Apply changes
        if let Some(name) = cmd.name {
            user.rename(Some(name));
        }

        if let Some(raw) = cmd.email {
            let email = Email::parse(&raw)?;
            if email != user.email {
                if let Some(owner) = self.users.find_by_email(&email).await? {
                    if owner.id != user.id {
                        return Err(AuthError::Conflict);
                    }
                }
                user.change_email(email);
            }
        }

        // 3. Persist; the store re-checks uniqueness
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user)
    }
}
