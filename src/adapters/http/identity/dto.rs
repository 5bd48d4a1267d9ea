//! HTTP DTOs for identity endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::identity::{AuthenticatedUser, Session, User};
use crate::domain::subscription::SubscriptionSnapshot;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to register an account.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request to sign in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A freshly issued session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user_id: String,
    pub expires_at: Timestamp,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.as_str().to_string(),
            user_id: session.user_id.to_string(),
            expires_at: session.expires_at,
        }
    }
}

/// Profile fields of a user.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// Name if set, otherwise email.
    pub display_name: String,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        AuthenticatedUser::from(user).into()
    }
}

impl From<AuthenticatedUser> for ProfileResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.display_name_or_email().to_string(),
            name: user.display_name,
        }
    }
}

/// The session owner together with the gating snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub subscription: SubscriptionSnapshot,
}
