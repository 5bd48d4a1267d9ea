//! ManualActivateHandler - self-service fallback when polling gave up.
//!
//! Equivalent to a synthetic "subscription active" event with a fixed
//! period. Not gated by proof of payment, so it is restricted to the
//! caller's own account, rate limited, and logged as security-sensitive.

use std::sync::Arc;

use crate::domain::foundation::{Email, Timestamp};
use crate::domain::identity::AuthenticatedUser;
use crate::domain::subscription::{
    SubscriptionError, SubscriptionSnapshot, SubscriptionTransition, TransitionOutcome,
};
use crate::ports::{RateLimitDecision, RateLimitKey, RateLimiter};

use super::{ApplyTransitionCommand, ApplyTransitionHandler};

/// Rate limiter resource name for manual activation.
pub const MANUAL_ACTIVATION_RESOURCE: &str = "manual_activation";

/// Command to manually activate the caller's subscription.
#[derive(Debug, Clone)]
pub struct ManualActivateCommand {
    pub caller: AuthenticatedUser,
    /// Target email. Defaults to the caller's; any other email is refused.
    pub email: Option<String>,
}

/// Handler for manual activation.
pub struct ManualActivateHandler {
    apply: Arc<ApplyTransitionHandler>,
    rate_limiter: Arc<dyn RateLimiter>,
    period_days: i64,
}

impl ManualActivateHandler {
    pub fn new(
        apply: Arc<ApplyTransitionHandler>,
        rate_limiter: Arc<dyn RateLimiter>,
        period_days: i64,
    ) -> Self {
        Self {
            apply,
            rate_limiter,
            period_days,
        }
    }

    pub async fn handle(
        &self,
        cmd: ManualActivateCommand,
    ) -> Result<SubscriptionSnapshot, SubscriptionError> {
        let caller = cmd.caller;

        // 1. Only the owner may activate
        let email = match cmd.email.as_deref().map(Email::parse) {
            None => caller.email.clone(),
            Some(Ok(email)) if email == caller.email => email,
            Some(_) => {
                tracing::warn!(
                    target: "security",
                    user_id = %caller.id,
                    "Manual activation refused for foreign email"
                );
                return Err(SubscriptionError::Forbidden);
            }
        };

        // 2. Throttle
        let key = RateLimitKey::new(caller.id, MANUAL_ACTIVATION_RESOURCE);
        match self.rate_limiter.check(&key).await {
            Ok(RateLimitDecision::Allowed { .. }) => {}
            Ok(RateLimitDecision::Denied { retry_after_secs }) => {
                tracing::warn!(
                    target: "security",
                    user_id = %caller.id,
                    "Manual activation rate limited"
                );
                return Err(SubscriptionError::RateLimited {
                    retry_after_secs: u64::from(retry_after_secs),
                });
            }
            Err(e) => return Err(SubscriptionError::internal(e.to_string())),
        }

        tracing::warn!(
            target: "security",
            user_id = %caller.id,
            email = %email.as_str(),
            period_days = self.period_days,
            "Manual subscription activation"
        );

        // 3. Apply the synthetic transition
        let now = Timestamp::now();
        let transition = SubscriptionTransition::manual_activation(email, self.period_days, now)
            .ok_or_else(|| SubscriptionError::internal("activation period out of range"))?;
        match self.apply.handle(ApplyTransitionCommand { transition }).await? {
            TransitionOutcome::Applied(state) => Ok(state.snapshot_at(&now)),
            TransitionOutcome::UserNotFound => Err(SubscriptionError::UserNotFound),
            TransitionOutcome::Stale { .. } => Err(SubscriptionError::internal(
                "manual activation was rejected as stale",
            )),
        }
    }
}
