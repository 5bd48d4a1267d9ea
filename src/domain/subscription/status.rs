//! Subscription status as held in the ledger.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Ledger subscription status.
///
/// Every account starts at `None`. `Canceled` is terminal until a new
/// checkout re-activates it; there is no transition table because the
/// payment provider, not this service, decides the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Never subscribed.
    #[default]
    None,

    /// In a provider-side trial.
    Trialing,

    /// Paid and current.
    Active,

    /// Payment failed, provider is retrying.
    PastDue,

    /// Ended or revoked.
    Canceled,
}

impl SubscriptionStatus {
    /// Returns true for the statuses that can grant access.
    ///
    /// Expiry still has to be checked; see `is_subscribed`.
    pub fn is_active_like(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::None => "none",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    /// Maps a provider-reported subscription status to the ledger status
    /// used for "subscription active/created/updated" events.
    ///
    /// Only `trialing` is preserved; anything else in that category means
    /// the subscription is live.
    pub fn from_provider(status: Option<&str>) -> Self {
        match status {
            Some(s) if s.eq_ignore_ascii_case("trialing") => SubscriptionStatus::Trialing,
            _ => SubscriptionStatus::Active,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SubscriptionStatus::None),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            // Providers disagree on the spelling.
            "canceled" | "cancelled" => Ok(SubscriptionStatus::Canceled),
            other => Err(ValidationError::invalid_format(
                "subscription_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_none() {
        assert_eq!(SubscriptionStatus::default(), SubscriptionStatus::None);
    }

    #[test]
    fn only_active_and_trialing_are_active_like() {
        assert!(SubscriptionStatus::Active.is_active_like());
        assert!(SubscriptionStatus::Trialing.is_active_like());
        assert!(!SubscriptionStatus::None.is_active_like());
        assert!(!SubscriptionStatus::PastDue.is_active_like());
        assert!(!SubscriptionStatus::Canceled.is_active_like());
    }

    #[test]
    fn string_form_round_trips() {
        for status in [
            SubscriptionStatus::None,
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn british_spelling_parses_as_canceled() {
        assert_eq!(
            "cancelled".parse::<SubscriptionStatus>().unwrap(),
            SubscriptionStatus::Canceled
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("paused".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn provider_trialing_maps_to_trialing_everything_else_to_active() {
        assert_eq!(
            SubscriptionStatus::from_provider(Some("trialing")),
            SubscriptionStatus::Trialing
        );
        assert_eq!(
            SubscriptionStatus::from_provider(Some("active")),
            SubscriptionStatus::Active
        );
        assert_eq!(
            SubscriptionStatus::from_provider(Some("incomplete")),
            SubscriptionStatus::Active
        );
        assert_eq!(SubscriptionStatus::from_provider(None), SubscriptionStatus::Active);
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::PastDue).unwrap(),
            "\"past_due\""
        );
    }
}
