//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool must allow at least one connection")]
    InvalidPoolSize,

    #[error("Session lifetime must be between 1 hour and 90 days")]
    InvalidSessionTtl,

    #[error("Minimum password length must be between 8 and 128")]
    InvalidPasswordMinLength,

    #[error("Signature tolerance must be between 1 and 3600 seconds")]
    InvalidSignatureTolerance,

    #[error("Subscription period must be between 1 and 366 days")]
    InvalidPeriodDays,

    #[error("Poll interval and attempts must be non-zero")]
    InvalidPollPolicy,

    #[error("Manual activation limit and window must be non-zero")]
    InvalidActivationLimit,

    #[error("Reconciliation poll window ({poll_secs}s) must be shorter than the request timeout ({timeout_secs}s)")]
    PollWindowExceedsTimeout { poll_secs: u64, timeout_secs: u64 },
}
