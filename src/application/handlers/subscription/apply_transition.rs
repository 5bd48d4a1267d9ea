//! ApplyTransitionHandler - the single write path into the ledger.
//!
//! Webhook ingestion and manual activation both go through here so that
//! ordering policy and logging are applied uniformly.

use std::sync::Arc;

use crate::domain::subscription::{
    OrderingPolicy, SubscriptionError, SubscriptionTransition, TransitionOutcome,
};
use crate::ports::SubscriptionLedger;

/// Command to apply one transition.
#[derive(Debug, Clone)]
pub struct ApplyTransitionCommand {
    pub transition: SubscriptionTransition,
}

/// Handler for ledger transitions.
pub struct ApplyTransitionHandler {
    ledger: Arc<dyn SubscriptionLedger>,
    policy: OrderingPolicy,
}

impl ApplyTransitionHandler {
    pub fn new(ledger: Arc<dyn SubscriptionLedger>, policy: OrderingPolicy) -> Self {
        Self { ledger, policy }
    }

    pub async fn handle(
        &self,
        cmd: ApplyTransitionCommand,
    ) -> Result<TransitionOutcome, SubscriptionError> {
        let t = &cmd.transition;
        let outcome = self.ledger.apply_transition(t, self.policy).await?;

        match &outcome {
            TransitionOutcome::Applied(state) => tracing::info!(
                email = %t.email.as_str(),
                status = %state.status,
                source = ?t.source,
                "Subscription transition applied"
            ),
            TransitionOutcome::Stale { last_event_at } => tracing::warn!(
                email = %t.email.as_str(),
                status = %t.status,
                observed_at = %t.observed_at.as_datetime(),
                last_event_at = %last_event_at.as_datetime(),
                "Stale subscription transition dropped"
            ),
            TransitionOutcome::UserNotFound => tracing::info!(
                email = %t.email.as_str(),
                source = ?t.source,
                "Subscription transition for unknown email ignored"
            ),
        }

        Ok(outcome)
    }
}
