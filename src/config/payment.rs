//! Payment provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Webhook verification settings for the payment provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Shared secret used to sign webhook deliveries
    pub webhook_secret: Option<SecretString>,

    /// Maximum signature age in seconds
    #[serde(default = "default_signature_tolerance")]
    pub signature_tolerance_secs: i64,
}

impl PaymentConfig {
    /// The signing secret, if one is configured and non-empty
    pub fn webhook_secret(&self) -> Option<&SecretString> {
        self.webhook_secret
            .as_ref()
            .filter(|s| !s.expose_secret().trim().is_empty())
    }

    /// Validate payment configuration
    ///
    /// Production refuses to start without a webhook secret.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if *environment == Environment::Production && self.webhook_secret().is_none() {
            return Err(ValidationError::MissingRequired("PAYMENT__WEBHOOK_SECRET"));
        }
        if !(1..=3600).contains(&self.signature_tolerance_secs) {
            return Err(ValidationError::InvalidSignatureTolerance);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            signature_tolerance_secs: default_signature_tolerance(),
        }
    }
}

fn default_signature_tolerance() -> i64 {
    300
}
