//! Bounded, cancellable reconciliation poll.
//!
//! After a checkout redirect the caller re-reads its subscription status
//! once per interval until it observes `is_subscribed`, runs out of
//! attempts, or is cancelled. Exhaustion hands off to manual activation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::UserId;
use crate::domain::subscription::{SubscriptionError, SubscriptionSnapshot};
use crate::ports::SubscriptionStatusSource;

use crate::application::handlers::subscription::{
    GetSubscriptionStatusHandler, GetSubscriptionStatusQuery,
};

/// Interval and attempt bound for one poll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
        }
    }
}

impl PollPolicy {
    /// Worst-case wall time of a run that never converges.
    pub fn window(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// How a poll run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// `is_subscribed` became true.
    Converged {
        snapshot: SubscriptionSnapshot,
        attempts: u32,
    },
    /// Every attempt ran without convergence. Offer manual activation.
    Exhausted {
        attempts: u32,
        last: Option<SubscriptionSnapshot>,
    },
    /// The caller stopped the run.
    Cancelled { attempts: u32 },
    /// The session is gone; further polls cannot succeed.
    Unauthorized { attempts: u32 },
}

impl PollOutcome {
    pub fn requires_manual_activation(&self) -> bool {
        matches!(self, PollOutcome::Exhausted { .. })
    }
}

/// Runs the poll loop against a status source.
pub struct ReconciliationPoller {
    source: Arc<dyn SubscriptionStatusSource>,
    policy: PollPolicy,
}

impl ReconciliationPoller {
    pub fn new(source: Arc<dyn SubscriptionStatusSource>, policy: PollPolicy) -> Self {
        Self { source, policy }
    }

    /// Poll until converged, exhausted or cancelled.
    ///
    /// Setting `cancel` to `true` stops the run before the next attempt.
    /// A dropped sender means the run can no longer be cancelled.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) -> PollOutcome {
        let mut last = None;

        for attempt in 1..=self.policy.max_attempts {
            let completed = attempt - 1;

            tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => {
                    tracing::debug!(attempts = completed, "Reconciliation poll cancelled");
                    return PollOutcome::Cancelled { attempts: completed };
                }
                _ = time::sleep(self.policy.interval) => {}
            }

            match self.source.fetch_status().await {
                Ok(snapshot) if snapshot.is_subscribed => {
                    tracing::info!(attempts = attempt, "Subscription reconciled");
                    return PollOutcome::Converged {
                        snapshot,
                        attempts: attempt,
                    };
                }
                Ok(snapshot) => last = Some(snapshot),
                Err(SubscriptionError::Unauthorized) => {
                    return PollOutcome::Unauthorized { attempts: attempt };
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Subscription status poll failed");
                }
            }
        }

        tracing::info!(
            attempts = self.policy.max_attempts,
            "Subscription not reconciled, manual activation available"
        );
        PollOutcome::Exhausted {
            attempts: self.policy.max_attempts,
            last,
        }
    }
}

/// Resolves once `rx` holds `true`. Never resolves if the sender is gone.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            futures::future::pending::<()>().await;
        }
    }
}

/// Server-side status source: reads the ledger directly for one user.
pub struct LedgerStatusSource {
    handler: Arc<GetSubscriptionStatusHandler>,
    user_id: UserId,
}

impl LedgerStatusSource {
    pub fn new(handler: Arc<GetSubscriptionStatusHandler>, user_id: UserId) -> Self {
        Self { handler, user_id }
    }
}

#[async_trait]
impl SubscriptionStatusSource for LedgerStatusSource {
    async fn fetch_status(&self) -> Result<SubscriptionSnapshot, SubscriptionError> {
        self.handler
            .handle(GetSubscriptionStatusQuery {
                user_id: self.user_id,
            })
            .await
    }
}
