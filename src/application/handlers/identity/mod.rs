//! Identity handlers.
//!
//! ## Commands
//! - Sign up, sign in, sign out
//! - Update profile
//!
//! ## Queries
//! - Validate session (also the `SessionValidator` used by HTTP middleware)

mod sign_in;
mod sign_out;
mod sign_up;
mod update_profile;
mod validate_session;

use std::sync::Arc;

use chrono::Duration;

use crate::domain::foundation::{ErrorCode, Timestamp, UserId};
use crate::domain::identity::{AuthError, PasswordHash, PasswordHasher, Session};
use crate::ports::SessionRepository;

pub use sign_in::{SignInCommand, SignInHandler, SignInResult};
pub use sign_out::{SignOutCommand, SignOutHandler};
pub use sign_up::{SignUpCommand, SignUpHandler, SignUpResult};
pub use update_profile::{UpdateProfileCommand, UpdateProfileHandler};
pub use validate_session::{ValidateSessionHandler, ValidateSessionQuery};

/// Tokens are 64 random alphanumerics, so a collision means a broken RNG
/// rather than bad luck. Retry a few times and then give up.
const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Session and password rules shared by the identity handlers.
#[derive(Debug, Clone, Copy)]
pub struct IdentityPolicy {
    pub session_ttl: Duration,
    pub password_min_length: usize,
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self {
            session_ttl: Duration::days(7),
            password_min_length: 8,
        }
    }
}

/// Creates and persists a fresh session for `user_id`.
async fn issue_session(
    sessions: &dyn SessionRepository,
    user_id: UserId,
    ttl: Duration,
) -> Result<Session, AuthError> {
    for _ in 0..MAX_TOKEN_ATTEMPTS {
        let session = Session::issue(user_id, ttl, Timestamp::now())
            .ok_or_else(|| AuthError::internal("session expiry out of range"))?;
        match sessions.create(&session).await {
            Ok(()) => return Ok(session),
            Err(e) if e.code == ErrorCode::SessionTokenCollision => {
                tracing::warn!(user_id = %user_id, "Session token collision, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(AuthError::internal("could not allocate a unique session token"))
}

/// Hashes off the async runtime; Argon2 is deliberately slow.
async fn hash_password(
    hasher: &Arc<PasswordHasher>,
    password: String,
) -> Result<PasswordHash, AuthError> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::internal(format!("spawn_blocking: {e}")))?
}

/// Verifies off the async runtime. With no stored hash, burns a dummy
/// verification and reports a mismatch.
async fn verify_password(
    hasher: &Arc<PasswordHasher>,
    password: String,
    stored: Option<PasswordHash>,
) -> Result<bool, AuthError> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || match stored {
        Some(hash) => hasher.verify(&password, &hash),
        None => {
            hasher.verify_dummy(&password);
            Ok(false)
        }
    })
    .await
    .map_err(|e| AuthError::internal(format!("spawn_blocking: {e}")))?
}
