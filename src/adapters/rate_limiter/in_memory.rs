//! In-memory rate limiter implementation.
//!
//! Fixed-window counters in a HashMap. Counters are per process, so
//! multi-instance deployments get one budget per instance.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{RateLimitDecision, RateLimitKey, RateLimiter};

/// Fixed-window rate limiter held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    requests_per_window: u32,
    window_secs: u32,
    windows: Arc<RwLock<HashMap<RateLimitKey, Window>>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    /// Unix seconds.
    ends_at: i64,
}

impl InMemoryRateLimiter {
    pub fn new(requests_per_window: u32, window_secs: u32) -> Self {
        Self {
            requests_per_window,
            window_secs,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }

    async fn check_at(&self, key: &RateLimitKey, now: i64) -> RateLimitDecision {
        let mut windows = self.windows.write().await;

        // Expired windows carry no information; dropping them bounds the map.
        windows.retain(|_, window| now < window.ends_at);

        let window = windows.entry(*key).or_insert(Window {
            count: 0,
            ends_at: now + i64::from(self.window_secs),
        });

        if window.count >= self.requests_per_window {
            let retry_after = u32::try_from(window.ends_at - now).unwrap_or(u32::MAX);
            return RateLimitDecision::Denied {
                retry_after_secs: retry_after.max(1),
            };
        }

        window.count += 1;
        RateLimitDecision::Allowed {
            remaining: self.requests_per_window - window.count,
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitDecision, DomainError> {
        Ok(self.check_at(key, Timestamp::now().as_unix_secs()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    const RESOURCE: &str = "manual_activation";
    const NOW: i64 = 1_704_067_200;

    fn key() -> RateLimitKey {
        RateLimitKey::new(UserId::new(), RESOURCE)
    }

    #[tokio::test]
    async fn allows_requests_up_to_limit() {
        let limiter = InMemoryRateLimiter::new(3, 3600);
        let key = key();

        for expected in [2, 1, 0] {
            assert_eq!(
                limiter.check(&key).await.unwrap(),
                RateLimitDecision::Allowed { remaining: expected }
            );
        }
    }

    #[tokio::test]
    async fn denies_past_limit_with_retry_hint() {
        let limiter = InMemoryRateLimiter::new(1, 3600);
        let key = key();

        limiter.check_at(&key, NOW).await;
        let decision = limiter.check_at(&key, NOW + 600).await;

        assert_eq!(decision, RateLimitDecision::Denied { retry_after_secs: 3000 });
    }

    #[tokio::test]
    async fn users_have_independent_budgets() {
        let limiter = InMemoryRateLimiter::new(1, 3600);
        let (a, b) = (key(), key());

        assert!(matches!(limiter.check(&a).await.unwrap(), RateLimitDecision::Allowed { .. }));
        assert!(matches!(limiter.check(&a).await.unwrap(), RateLimitDecision::Denied { .. }));
        assert!(matches!(limiter.check(&b).await.unwrap(), RateLimitDecision::Allowed { .. }));
    }

    #[tokio::test]
    async fn budget_returns_when_window_ends() {
        let limiter = InMemoryRateLimiter::new(1, 60);
        let key = key();

        limiter.check_at(&key, NOW).await;
        assert!(matches!(limiter.check_at(&key, NOW + 59).await, RateLimitDecision::Denied { .. }));
        assert_eq!(
            limiter.check_at(&key, NOW + 60).await,
            RateLimitDecision::Allowed { remaining: 0 }
        );
    }

    #[tokio::test]
    async fn expired_windows_are_evicted() {
        let limiter = InMemoryRateLimiter::new(3, 60);

        for _ in 0..10 {
            limiter.check_at(&key(), NOW).await;
        }
        assert_eq!(limiter.tracked_keys().await, 10);

        limiter.check_at(&key(), NOW + 60).await;
        assert_eq!(limiter.tracked_keys().await, 1);
    }
}
