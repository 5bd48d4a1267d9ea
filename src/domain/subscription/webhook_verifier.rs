//! Payment-provider webhook signature verification.
//!
//! Standard-Webhooks style HMAC-SHA256 over `"<t>.<raw body>"`, with a
//! replay window on `t`. Verification happens before the body is parsed.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::Timestamp;

use super::webhook_errors::WebhookError;

/// Default maximum age of a signature (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Maximum allowed clock skew for future timestamps (1 minute).
pub(crate) const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components of the signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// Every `v1` signature supplied. More than one during secret rotation.
    pub signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<hex>[,v1=<hex>...]`. Unknown keys are
    /// ignored.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut signatures = Vec::new();

        for part in header.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::MalformedSignature("invalid header format".into()))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::MalformedSignature("invalid timestamp".into())
                    })?);
                }
                "v1" => {
                    signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::MalformedSignature("invalid v1 signature hex".into())
                    })?);
                }
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| WebhookError::MalformedSignature("missing timestamp".into()))?;
        if signatures.is_empty() {
            return Err(WebhookError::MalformedSignature("missing v1 signature".into()));
        }

        Ok(SignatureHeader {
            timestamp,
            signatures,
        })
    }
}

/// Proof that a payload was signed by the holder of the shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedSignature {
    /// The signature's `t`, usable as the event's observation time.
    pub signed_at: i64,
}

/// Verifier for webhook signatures.
pub struct WebhookVerifier {
    secret: SecretString,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString, tolerance_secs: i64) -> Self {
        Self {
            secret,
            tolerance_secs,
        }
    }

    /// Verifies `signature_header` against the raw `payload`.
    ///
    /// Steps: parse the header, check the timestamp window, recompute the
    /// HMAC and compare it in constant time against every `v1` entry.
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: Timestamp,
    ) -> Result<VerifiedSignature, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp, now.as_unix_secs())?;

        let expected = self.compute_signature(header.timestamp, payload)?;

        // No short-circuit: every candidate is compared.
        let matched = header
            .signatures
            .iter()
            .fold(false, |acc, candidate| acc | constant_time_compare(&expected, candidate));

        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(VerifiedSignature {
            signed_at: header.timestamp,
        })
    }

    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let age = now - timestamp;

        if age > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange);
        }

        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| WebhookError::Internal(format!("hmac key: {e}")))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a hex HMAC-SHA256 signature for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
