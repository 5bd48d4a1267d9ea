//! Subscription module - the ledger and its reconciliation inputs.
//!
//! # Overview
//!
//! A user's subscription state is a cache of payment-provider truth. It is
//! written only through `SubscriptionState::apply`, fed by verified
//! webhook events or by manual activation, and read through the single
//! `is_subscribed` derivation.
//!
//! # Ordering
//!
//! Every provider transition carries the time the provider observed it.
//! Under `OrderingPolicy::RejectStale` a transition older than the last
//! applied one is dropped, so late redeliveries cannot regress state.

mod errors;
mod state;
mod status;
mod transition;
mod webhook_errors;
mod webhook_event;
mod webhook_verifier;

pub use errors::SubscriptionError;
pub use state::{is_subscribed, StaleTransition, SubscriptionSnapshot, SubscriptionState};
pub use status::SubscriptionStatus;
pub use transition::{OrderingPolicy, SubscriptionTransition, TransitionOutcome, TransitionSource};
pub use webhook_errors::WebhookError;
pub use webhook_event::{EventEffect, ProviderEventType, WebhookEnvelope};
pub use webhook_verifier::{
    SignatureHeader, VerifiedSignature, WebhookVerifier, DEFAULT_TOLERANCE_SECS,
};

#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
