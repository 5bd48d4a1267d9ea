//! GetSubscriptionStatusHandler - Query handler for the gating snapshot.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::subscription::{SubscriptionError, SubscriptionSnapshot};
use crate::ports::SubscriptionLedger;

/// Query for a user's current subscription snapshot.
#[derive(Debug, Clone)]
pub struct GetSubscriptionStatusQuery {
    pub user_id: UserId,
}

/// Handler for subscription status reads. Pure read.
pub struct GetSubscriptionStatusHandler {
    ledger: Arc<dyn SubscriptionLedger>,
}

impl GetSubscriptionStatusHandler {
    pub fn new(ledger: Arc<dyn SubscriptionLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionStatusQuery,
    ) -> Result<SubscriptionSnapshot, SubscriptionError> {
        let state = self
            .ledger
            .find_by_user(&query.user_id)
            .await?
            .ok_or(SubscriptionError::UserNotFound)?;

        Ok(state.snapshot_at(&Timestamp::now()))
    }
}
