//! Ledger transitions and their outcomes.

use serde::Serialize;

use crate::domain::foundation::{Email, Timestamp};

use super::{SubscriptionState, SubscriptionStatus};

/// Where a transition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionSource {
    /// A verified payment-provider event.
    Webhook,
    /// A user-invoked fallback after polling gave up.
    ManualActivation,
}

/// How the ledger resolves transitions that arrive out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Drop transitions observed strictly before the last applied event.
    #[default]
    RejectStale,
    /// Apply everything; the latest write wins.
    LastWriteWins,
}

impl OrderingPolicy {
    pub fn from_flag(reject_stale: bool) -> Self {
        if reject_stale {
            OrderingPolicy::RejectStale
        } else {
            OrderingPolicy::LastWriteWins
        }
    }
}

/// A requested change to one user's subscription, addressed by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionTransition {
    pub email: Email,
    pub status: SubscriptionStatus,
    /// Overwrites the stored customer id only when present.
    pub customer_id: Option<String>,
    /// Overwrites the stored expiry only when present.
    pub expires_at: Option<Timestamp>,
    /// When the provider says the underlying event happened.
    pub observed_at: Timestamp,
    pub source: TransitionSource,
}

impl SubscriptionTransition {
    /// The synthetic "subscription active" event used by manual activation.
    ///
    /// `None` when the period end is not representable.
    pub fn manual_activation(email: Email, period_days: i64, now: Timestamp) -> Option<Self> {
        Some(Self {
            email,
            status: SubscriptionStatus::Active,
            customer_id: None,
            expires_at: Some(now.add_days(period_days)?),
            observed_at: now,
            source: TransitionSource::ManualActivation,
        })
    }
}

/// Result of applying a transition to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The state was written; carries the state after the write.
    Applied(SubscriptionState),
    /// An older event than the one already applied; nothing was written.
    Stale { last_event_at: Timestamp },
    /// No user has this email; nothing was written.
    UserNotFound,
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}
