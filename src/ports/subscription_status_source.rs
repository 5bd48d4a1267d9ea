//! Port the reconciliation poller reads from.
//!
//! Server-side the source is the ledger itself; client-side it is the
//! status endpoint reached over HTTP with the caller's session token.

use async_trait::async_trait;

use crate::domain::subscription::{SubscriptionError, SubscriptionSnapshot};

/// Something that can report the caller's current subscription snapshot.
#[async_trait]
pub trait SubscriptionStatusSource: Send + Sync {
    /// Fetch the authoritative snapshot. Called once per poll attempt.
    async fn fetch_status(&self) -> Result<SubscriptionSnapshot, SubscriptionError>;
}
