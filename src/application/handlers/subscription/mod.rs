//! Subscription handlers.
//!
//! ## Commands
//! - Apply a ledger transition (the single write path)
//! - Ingest a payment-provider webhook
//! - Manually activate the caller's subscription
//!
//! ## Queries
//! - Get subscription status

mod apply_transition;
mod get_status;
mod ingest_webhook;
mod manual_activate;

pub use apply_transition::{ApplyTransitionCommand, ApplyTransitionHandler};
pub use get_status::{GetSubscriptionStatusHandler, GetSubscriptionStatusQuery};
pub use ingest_webhook::{IngestOutcome, IngestWebhookCommand, IngestWebhookHandler};
pub use manual_activate::{
    ManualActivateCommand, ManualActivateHandler, MANUAL_ACTIVATION_RESOURCE,
};
