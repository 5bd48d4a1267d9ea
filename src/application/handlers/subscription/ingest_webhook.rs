//! IngestWebhookHandler - Command handler for payment-provider callbacks.
//!
//! Verifies the signature over the raw body, parses the envelope, maps it
//! to a ledger transition and applies it by email. Only a bad request or
//! an internal failure is an error; everything else is acknowledged so the
//! provider stops redelivering.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{
    EventEffect, SubscriptionError, TransitionOutcome, WebhookEnvelope, WebhookError,
    WebhookVerifier,
};

use super::{ApplyTransitionCommand, ApplyTransitionHandler};

/// Command carrying one webhook delivery.
#[derive(Debug, Clone)]
pub struct IngestWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header, if the request had one.
    pub signature: Option<String>,
}

/// Accepted outcomes of webhook ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The ledger was updated.
    Applied,
    /// No user has the event's email.
    UserNotFound,
    /// The event is older than what the ledger already holds.
    Stale,
    /// Recognised event with no ledger effect.
    Acknowledged,
    /// Unrecognised event type.
    Ignored { event_type: String },
    /// Recognised event without a usable customer email.
    NoRecipient,
}

/// Handler for webhook ingestion.
pub struct IngestWebhookHandler {
    /// `None` disables verification. Development only.
    verifier: Option<Arc<WebhookVerifier>>,
    apply: Arc<ApplyTransitionHandler>,
    default_period_days: i64,
}

impl IngestWebhookHandler {
    pub fn new(
        verifier: Option<Arc<WebhookVerifier>>,
        apply: Arc<ApplyTransitionHandler>,
        default_period_days: i64,
    ) -> Self {
        Self {
            verifier,
            apply,
            default_period_days,
        }
    }

    pub async fn handle(&self, cmd: IngestWebhookCommand) -> Result<IngestOutcome, WebhookError> {
        let now = Timestamp::now();

        // 1. Verify signature before looking at the body
        let signed_at = match &self.verifier {
            Some(verifier) => {
                let header = cmd.signature.as_deref().ok_or_else(|| {
                    tracing::warn!(target: "security", "Webhook rejected: missing signature header");
                    WebhookError::MissingSignature
                })?;
                let verified = verifier.verify(&cmd.payload, header, now).map_err(|e| {
                    tracing::warn!(target: "security", error = %e, "Webhook rejected");
                    e
                })?;
                Some(verified.signed_at)
            }
            None => {
                tracing::warn!(
                    target: "security",
                    "Webhook signature verification disabled, accepting unverified payload"
                );
                None
            }
        };

        // 2. Parse envelope
        let envelope = WebhookEnvelope::parse(&cmd.payload)?;
        tracing::info!(event_type = %envelope.event_type, "Webhook received");

        // 3. Decide the event's observation time
        let reference = signed_at.and_then(Timestamp::from_unix_secs).unwrap_or(now);
        let observed_at = envelope.occurred_at(reference).unwrap_or(reference);

        // 4. Map and apply
        let transition = match envelope.to_effect(observed_at, self.default_period_days)? {
            EventEffect::Transition(transition) => transition,
            EventEffect::Acknowledged => return Ok(IngestOutcome::Acknowledged),
            EventEffect::Ignored { event_type } => {
                tracing::info!(event_type = %event_type, "Unhandled webhook event ignored");
                return Ok(IngestOutcome::Ignored { event_type });
            }
            EventEffect::NoRecipient => {
                tracing::warn!(
                    event_type = %envelope.event_type,
                    "Webhook event has no usable customer email"
                );
                return Ok(IngestOutcome::NoRecipient);
            }
        };

        let outcome = self
            .apply
            .handle(ApplyTransitionCommand { transition })
            .await
            .map_err(|e| match e {
                SubscriptionError::Internal(msg) => WebhookError::Internal(msg),
                other => WebhookError::Internal(other.to_string()),
            })?;

        Ok(match outcome {
            TransitionOutcome::Applied(_) => IngestOutcome::Applied,
            TransitionOutcome::Stale { .. } => IngestOutcome::Stale,
            TransitionOutcome::UserNotFound => IngestOutcome::UserNotFound,
        })
    }
}
