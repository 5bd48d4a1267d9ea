//! Session entity.

use chrono::Duration;

use crate::domain::foundation::{Timestamp, UserId};

use super::SessionToken;

/// A bearer session binding a token to a user until `expires_at`.
///
/// Expired sessions are not deleted; they simply stop validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl Session {
    /// Issues a fresh session with a newly generated token.
    ///
    /// `None` when `now + ttl` is not representable.
    pub fn issue(user_id: UserId, ttl: Duration, now: Timestamp) -> Option<Self> {
        Some(Self {
            token: SessionToken::generate(),
            user_id,
            expires_at: now.add(ttl)?,
            created_at: now,
        })
    }

    /// A session is expired once `expires_at` lies strictly before `now`.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        self.expires_at.is_before(now)
    }
}
