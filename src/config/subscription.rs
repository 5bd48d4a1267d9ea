//! Subscription ledger and reconciliation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Access period granted when an event carries no period end
    #[serde(default = "default_period_days")]
    pub default_period_days: i64,

    /// Delay between reconciliation polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum reconciliation polls per run
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Manual activations allowed per user per window
    #[serde(default = "default_manual_activation_limit")]
    pub manual_activation_limit: u32,

    /// Manual activation window in seconds
    #[serde(default = "default_manual_activation_window")]
    pub manual_activation_window_secs: u32,

    /// Drop provider events older than the last applied one
    #[serde(default = "default_reject_stale_events")]
    pub reject_stale_events: bool,
}

impl SubscriptionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Worst-case duration of one reconciliation run
    pub fn poll_window(&self) -> Duration {
        self.poll_interval() * self.poll_attempts
    }

    /// Validate subscription configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=366).contains(&self.default_period_days) {
            return Err(ValidationError::InvalidPeriodDays);
        }
        if self.poll_interval_ms == 0 || self.poll_attempts == 0 {
            return Err(ValidationError::InvalidPollPolicy);
        }
        if self.manual_activation_limit == 0 || self.manual_activation_window_secs == 0 {
            return Err(ValidationError::InvalidActivationLimit);
        }
        Ok(())
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            default_period_days: default_period_days(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_attempts: default_poll_attempts(),
            manual_activation_limit: default_manual_activation_limit(),
            manual_activation_window_secs: default_manual_activation_window(),
            reject_stale_events: default_reject_stale_events(),
        }
    }
}

fn default_period_days() -> i64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_poll_attempts() -> u32 {
    30
}

fn default_manual_activation_limit() -> u32 {
    3
}

fn default_manual_activation_window() -> u32 {
    3600
}

fn default_reject_stale_events() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_config_defaults() {
        let config = SubscriptionConfig::default();
        assert_eq!(config.default_period_days, 30);
        assert_eq!(config.poll_window(), Duration::from_secs(30));
        assert!(config.reject_stale_events);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        let config = SubscriptionConfig {
            poll_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPollPolicy));
    }

    #[test]
    fn test_period_days_bounds() {
        let config = SubscriptionConfig {
            default_period_days: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPeriodDays));
    }

    #[test]
    fn test_activation_limit_must_be_positive() {
        let config = SubscriptionConfig {
            manual_activation_limit: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidActivationLimit)
        );
    }
}
