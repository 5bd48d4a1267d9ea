//! Per-user ledger state and the single `is_subscribed` derivation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{OrderingPolicy, SubscriptionStatus, SubscriptionTransition, TransitionSource};

/// Whether a user currently has access.
///
/// This is the only place the gating boolean is computed. An active-like
/// status with no expiry never lapses; otherwise expiry must lie strictly
/// in the future.
pub fn is_subscribed(
    status: SubscriptionStatus,
    expires_at: Option<&Timestamp>,
    now: &Timestamp,
) -> bool {
    status.is_active_like() && expires_at.map_or(true, |exp| exp.is_after(now))
}

/// Canonical local copy of a user's subscription.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubscriptionState {
    pub status: SubscriptionStatus,
    pub expires_at: Option<Timestamp>,
    pub external_customer_id: Option<String>,
    /// Newest provider event applied so far. Manual activation leaves it alone.
    pub last_event_at: Option<Timestamp>,
}

/// Returned when a transition is older than what the ledger already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleTransition {
    pub last_event_at: Timestamp,
}

impl SubscriptionState {
    /// Computes the state after `transition`, without mutating `self`.
    ///
    /// Status always overwrites. Customer id and expiry overwrite only when
    /// the transition carries them. Applying the same transition twice
    /// yields the same state as applying it once.
    pub fn apply(
        &self,
        transition: &SubscriptionTransition,
        policy: OrderingPolicy,
    ) -> Result<SubscriptionState, StaleTransition> {
        let from_provider = transition.source == TransitionSource::Webhook;

        if from_provider && policy == OrderingPolicy::RejectStale {
            if let Some(last) = self.last_event_at {
                if transition.observed_at.is_before(&last) {
                    return Err(StaleTransition {
                        last_event_at: last,
                    });
                }
            }
        }

        let last_event_at = if from_provider {
            Some(match self.last_event_at {
                Some(last) => last.max(transition.observed_at),
                None => transition.observed_at,
            })
        } else {
            self.last_event_at
        };

        Ok(SubscriptionState {
            status: transition.status,
            expires_at: transition.expires_at.or(self.expires_at),
            external_customer_id: transition
                .customer_id
                .clone()
                .or_else(|| self.external_customer_id.clone()),
            last_event_at,
        })
    }

    pub fn is_subscribed_at(&self, now: &Timestamp) -> bool {
        is_subscribed(self.status, self.expires_at.as_ref(), now)
    }

    pub fn snapshot_at(&self, now: &Timestamp) -> SubscriptionSnapshot {
        SubscriptionSnapshot {
            status: self.status,
            is_subscribed: self.is_subscribed_at(now),
            expires_at: self.expires_at,
        }
    }
}

/// Read model returned by status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSnapshot {
    pub status: SubscriptionStatus,
    pub is_subscribed: bool,
    pub expires_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Email;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs).unwrap()
    }

    fn webhook(status: SubscriptionStatus, expires: Option<i64>, observed: i64) -> SubscriptionTransition {
        SubscriptionTransition {
            email: Email::parse("a@x.com").unwrap(),
            status,
            customer_id: Some("cus_1".to_string()),
            expires_at: expires.map(at),
            observed_at: at(observed),
            source: TransitionSource::Webhook,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // is_subscribed
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn active_without_expiry_is_subscribed() {
        assert!(is_subscribed(SubscriptionStatus::Active, None, &at(100)));
    }

    #[test]
    fn active_with_past_expiry_is_not_subscribed() {
        assert!(!is_subscribed(SubscriptionStatus::Active, Some(&at(50)), &at(100)));
    }

    #[test]
    fn expiry_equal_to_now_is_not_subscribed() {
        assert!(!is_subscribed(SubscriptionStatus::Trialing, Some(&at(100)), &at(100)));
    }

    #[test]
    fn non_active_statuses_are_never_subscribed() {
        for status in [
            SubscriptionStatus::None,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
        ] {
            assert!(!is_subscribed(status, Some(&at(1_000)), &at(100)));
            assert!(!is_subscribed(status, None, &at(100)));
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // apply
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn applying_same_transition_twice_is_idempotent() {
        let t = webhook(SubscriptionStatus::Active, Some(5_000), 100);
        let once = SubscriptionState::default()
            .apply(&t, OrderingPolicy::RejectStale)
            .unwrap();
        let twice = once.apply(&t, OrderingPolicy::RejectStale).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn trialing_then_active_stays_subscribed_and_takes_later_expiry() {
        let now = at(150);
        let s1 = SubscriptionState::default()
            .apply(
                &webhook(SubscriptionStatus::Trialing, Some(1_000), 100),
                OrderingPolicy::RejectStale,
            )
            .unwrap();
        assert!(s1.is_subscribed_at(&now));

        let s2 = s1
            .apply(
                &webhook(SubscriptionStatus::Active, Some(2_000), 110),
                OrderingPolicy::RejectStale,
            )
            .unwrap();
        assert!(s2.is_subscribed_at(&now));
        assert_eq!(s2.expires_at, Some(at(2_000)));
    }

    #[test]
    fn absent_fields_do_not_clear_stored_values() {
        let s1 = SubscriptionState::default()
            .apply(
                &webhook(SubscriptionStatus::Active, Some(1_000), 100),
                OrderingPolicy::RejectStale,
            )
            .unwrap();

        let mut bare = webhook(SubscriptionStatus::PastDue, None, 120);
        bare.customer_id = None;
        let s2 = s1.apply(&bare, OrderingPolicy::RejectStale).unwrap();

        assert_eq!(s2.status, SubscriptionStatus::PastDue);
        assert_eq!(s2.expires_at, Some(at(1_000)));
        assert_eq!(s2.external_customer_id.as_deref(), Some("cus_1"));
    }

    #[test]
    fn older_event_is_stale_under_reject_stale() {
        let s1 = SubscriptionState::default()
            .apply(
                &webhook(SubscriptionStatus::Active, Some(2_000), 200),
                OrderingPolicy::RejectStale,
            )
            .unwrap();

        let result = s1.apply(
            &webhook(SubscriptionStatus::Trialing, Some(1_000), 150),
            OrderingPolicy::RejectStale,
        );
        assert_eq!(result, Err(StaleTransition { last_event_at: at(200) }));
    }

    #[test]
    fn older_event_overwrites_under_last_write_wins() {
        let s1 = SubscriptionState::default()
            .apply(
                &webhook(SubscriptionStatus::Active, Some(2_000), 200),
                OrderingPolicy::LastWriteWins,
            )
            .unwrap();
        let s2 = s1
            .apply(
                &webhook(SubscriptionStatus::Trialing, Some(1_000), 150),
                OrderingPolicy::LastWriteWins,
            )
            .unwrap();

        assert_eq!(s2.status, SubscriptionStatus::Trialing);
        // The watermark never moves backwards.
        assert_eq!(s2.last_event_at, Some(at(200)));
    }

    #[test]
    fn manual_activation_bypasses_guard_and_keeps_watermark() {
        let s1 = SubscriptionState::default()
            .apply(
                &webhook(SubscriptionStatus::Canceled, Some(200), 200),
                OrderingPolicy::RejectStale,
            )
            .unwrap();

        let manual = SubscriptionTransition::manual_activation(
            Email::parse("a@x.com").unwrap(),
            30,
            at(100),
        )
        .unwrap();
        let s2 = s1.apply(&manual, OrderingPolicy::RejectStale).unwrap();

        assert_eq!(s2.status, SubscriptionStatus::Active);
        assert_eq!(s2.expires_at, Some(at(100 + 30 * 86_400)));
        assert_eq!(s2.last_event_at, Some(at(200)));
    }

    #[test]
    fn snapshot_reflects_derivation() {
        let state = SubscriptionState {
            status: SubscriptionStatus::Active,
            expires_at: Some(at(50)),
            ..Default::default()
        };
        let snapshot = state.snapshot_at(&at(100));
        assert_eq!(snapshot.status, SubscriptionStatus::Active);
        assert!(!snapshot.is_subscribed);
    }
}
