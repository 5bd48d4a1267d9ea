//! Payment-provider event envelope and its mapping to ledger transitions.
//!
//! Provider payloads are loosely shaped; field lookups use JSON pointers
//! with fallbacks rather than rigid structs so that an unexpected field
//! layout degrades to a logged no-op instead of a rejected delivery.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::{Email, Timestamp};

use super::webhook_verifier::MAX_CLOCK_SKEW_SECS;
use super::{SubscriptionStatus, SubscriptionTransition, TransitionSource, WebhookError};

/// Epoch numbers at or above this are read as milliseconds.
const MILLIS_THRESHOLD: f64 = 100_000_000_000.0;

const CHECKOUT_EMAIL: &[&str] = &["/customer_email", "/customer/email", "/email"];
const CHECKOUT_CUSTOMER: &[&str] = &["/customer_id", "/customer/id"];
const BILLING_EMAIL: &[&str] = &["/customer/email", "/user/email", "/customer_email"];
const BILLING_CUSTOMER: &[&str] = &["/customer/id", "/customer_id"];
const STATE_EMAIL: &[&str] = &["/customer/email"];
const STATE_CUSTOMER: &[&str] = &["/customer/id"];

/// Outer event envelope: `{ "type": ..., "timestamp": ..., "data": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type", alias = "event")]
    pub event_type: String,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub data: Value,
}

impl WebhookEnvelope {
    /// Parses a verified raw body.
    pub fn parse(raw: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(raw).map_err(|e| WebhookError::MalformedEvent(e.to_string()))
    }

    pub fn kind(&self) -> ProviderEventType {
        ProviderEventType::parse(&self.event_type)
    }

    /// When the provider says the event happened, if it said so legibly.
    ///
    /// A claim more than the allowed clock skew past `reference` (the
    /// signature time, or now) is discarded.
    pub fn occurred_at(&self, reference: Timestamp) -> Option<Timestamp> {
        let claimed = self.timestamp.as_ref().and_then(parse_instant)?;
        let latest = reference.as_unix_secs().saturating_add(MAX_CLOCK_SKEW_SECS);
        (claimed.as_unix_secs() <= latest).then_some(claimed)
    }

    /// Maps the event to its effect on the ledger.
    ///
    /// Derived expiries are anchored at `observed_at` so that a redelivered
    /// event produces the same transition.
    pub fn to_effect(
        &self,
        observed_at: Timestamp,
        default_period_days: i64,
    ) -> Result<EventEffect, WebhookError> {
        let data = &self.data;
        let default_expiry = observed_at
            .add_days(default_period_days)
            .ok_or_else(|| WebhookError::MalformedEvent("event time out of range".into()))?;

        let (email_paths, customer_paths, status, expires_at) = match self.kind() {
            ProviderEventType::CheckoutInProgress => return Ok(EventEffect::Acknowledged),
            ProviderEventType::Unknown(kind) => {
                return Ok(EventEffect::Ignored { event_type: kind })
            }

            ProviderEventType::CheckoutCompleted => (
                CHECKOUT_EMAIL,
                CHECKOUT_CUSTOMER,
                SubscriptionStatus::Active,
                default_expiry,
            ),
            ProviderEventType::OrderCreated => (
                BILLING_EMAIL,
                BILLING_CUSTOMER,
                SubscriptionStatus::Active,
                period_end(data.pointer("/subscription/current_period_end"))
                    .unwrap_or(default_expiry),
            ),
            ProviderEventType::SubscriptionActive => (
                BILLING_EMAIL,
                BILLING_CUSTOMER,
                SubscriptionStatus::from_provider(
                    data.get("status").and_then(Value::as_str),
                ),
                period_end(data.get("current_period_end")).unwrap_or(default_expiry),
            ),
            ProviderEventType::SubscriptionCanceled => (
                BILLING_EMAIL,
                BILLING_CUSTOMER,
                SubscriptionStatus::Canceled,
                observed_at,
            ),
            ProviderEventType::CustomerStateChanged => {
                let live = data
                    .get("subscriptions")
                    .and_then(Value::as_array)
                    .and_then(|subs| subs.iter().find(|sub| is_live_subscription(sub)));

                match live {
                    Some(sub) => (
                        STATE_EMAIL,
                        STATE_CUSTOMER,
                        SubscriptionStatus::from_provider(
                            sub.get("status").and_then(Value::as_str),
                        ),
                        period_end(sub.get("current_period_end")).unwrap_or(default_expiry),
                    ),
                    None => (
                        STATE_EMAIL,
                        STATE_CUSTOMER,
                        SubscriptionStatus::Canceled,
                        observed_at,
                    ),
                }
            }
        };

        let email = match first_str(data, email_paths).map(Email::parse) {
            Some(Ok(email)) => email,
            Some(Err(_)) | None => return Ok(EventEffect::NoRecipient),
        };

        Ok(EventEffect::Transition(SubscriptionTransition {
            email,
            status,
            customer_id: first_str(data, customer_paths).map(str::to_string),
            expires_at: Some(expires_at),
            observed_at,
            source: TransitionSource::Webhook,
        }))
    }
}

/// Event categories the ledger reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEventType {
    /// `checkout.created`, `checkout.updated`
    CheckoutInProgress,
    /// `checkout.completed`
    CheckoutCompleted,
    /// `order.created`
    OrderCreated,
    /// `subscription.created`, `subscription.updated`, `subscription.active`
    SubscriptionActive,
    /// `subscription.canceled`, `subscription.revoked`
    SubscriptionCanceled,
    /// `customer.state_changed`
    CustomerStateChanged,
    Unknown(String),
}

impl ProviderEventType {
    pub fn parse(event_type: &str) -> Self {
        match event_type {
            "checkout.created" | "checkout.updated" => ProviderEventType::CheckoutInProgress,
            "checkout.completed" => ProviderEventType::CheckoutCompleted,
            "order.created" => ProviderEventType::OrderCreated,
            "subscription.created" | "subscription.updated" | "subscription.active" => {
                ProviderEventType::SubscriptionActive
            }
            "subscription.canceled" | "subscription.revoked" => {
                ProviderEventType::SubscriptionCanceled
            }
            "customer.state_changed" => ProviderEventType::CustomerStateChanged,
            other => ProviderEventType::Unknown(other.to_string()),
        }
    }
}

/// What a verified event asks of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEffect {
    /// Apply this transition.
    Transition(SubscriptionTransition),
    /// Recognised, but requires no ledger change.
    Acknowledged,
    /// Unrecognised type; logged and ignored.
    Ignored { event_type: String },
    /// Recognised, but carried no usable customer email.
    NoRecipient,
}

fn is_live_subscription(sub: &Value) -> bool {
    matches!(
        sub.get("status").and_then(Value::as_str),
        Some("active") | Some("trialing")
    )
}

fn first_str<'a>(data: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .filter_map(|p| data.pointer(p).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

fn period_end(value: Option<&Value>) -> Option<Timestamp> {
    value.and_then(parse_instant)
}

/// Reads an RFC 3339 string or an epoch number (seconds or milliseconds).
fn parse_instant(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc))),
        Value::Number(n) => {
            let n = n.as_f64()?;
            if n.abs() >= MILLIS_THRESHOLD {
                Timestamp::from_unix_millis(n as i64)
            } else {
                Timestamp::from_unix_secs(n as i64)
            }
        }
        _ => None,
    }
}
