//! Subscription ledger port.
//!
//! The ledger is the only writer of subscription state. Implementations
//! must perform the read-compare-write of `apply_transition` atomically per
//! user (a row lock, a conditional update, or a mutex), and must compute
//! the new state with `SubscriptionState::apply` so every backend shares
//! the same ordering rules.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{
    OrderingPolicy, SubscriptionState, SubscriptionTransition, TransitionOutcome,
};

/// Port for reading and transitioning per-user subscription state.
#[async_trait]
pub trait SubscriptionLedger: Send + Sync {
    /// Apply a transition to the user owning `transition.email`.
    ///
    /// Returns `UserNotFound` (not an error) if no user has that email,
    /// and `Stale` if the policy rejected an out-of-order event.
    async fn apply_transition(
        &self,
        transition: &SubscriptionTransition,
        policy: OrderingPolicy,
    ) -> Result<TransitionOutcome, DomainError>;

    /// Current state for a user. Returns `None` if the user doesn't exist.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Option<SubscriptionState>, DomainError>;
}
