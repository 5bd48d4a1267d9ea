//! Rate limiting port for throttling sensitive operations.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// Port for fixed-window rate limiting.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Consumes one unit of `key`'s budget if any is left.
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitDecision, DomainError>;
}

/// A per-user budget for one named resource.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub user_id: UserId,
    pub resource: &'static str,
}

impl RateLimitKey {
    pub fn new(user_id: UserId, resource: &'static str) -> Self {
        Self { user_id, resource }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Denied { retry_after_secs: u32 },
}
