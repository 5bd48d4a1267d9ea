//! HTTP DTOs for subscription and webhook endpoints.

use serde::{Deserialize, Serialize};

use crate::application::reconciliation::PollOutcome;
use crate::domain::subscription::SubscriptionSnapshot;

/// Request body for manual activation. The body itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualActivateRequest {
    /// Must be the caller's own email when present.
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a server-side reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResponse {
    /// `converged`, `exhausted` or `cancelled`.
    pub outcome: &'static str,
    pub attempts: u32,
    /// Last snapshot observed, if any.
    pub subscription: Option<SubscriptionSnapshot>,
    /// True when the client should offer manual activation.
    pub manual_activation_available: bool,
}

impl ReconcileResponse {
    /// Builds the response for every outcome but `Unauthorized`.
    pub fn from_outcome(outcome: PollOutcome) -> Option<Self> {
        let manual_activation_available = outcome.requires_manual_activation();
        let (label, attempts, subscription) = match outcome {
            PollOutcome::Converged { snapshot, attempts } => ("converged", attempts, Some(snapshot)),
            PollOutcome::Exhausted { attempts, last } => ("exhausted", attempts, last),
            PollOutcome::Cancelled { attempts } => ("cancelled", attempts, None),
            PollOutcome::Unauthorized { .. } => return None,
        };

        Some(Self {
            outcome: label,
            attempts,
            subscription,
            manual_activation_available,
        })
    }
}

/// Acknowledgement returned to the payment provider.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_offers_manual_activation() {
        let response = ReconcileResponse::from_outcome(PollOutcome::Exhausted {
            attempts: 30,
            last: None,
        })
        .unwrap();

        assert_eq!(response.outcome, "exhausted");
        assert!(response.manual_activation_available);
    }

    #[test]
    fn unauthorized_has_no_body() {
        assert!(ReconcileResponse::from_outcome(PollOutcome::Unauthorized { attempts: 1 }).is_none());
    }
}
