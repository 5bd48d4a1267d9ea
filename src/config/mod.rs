//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `SCRIPTORIUM` prefix
//! and `__` as the nesting separator.
//!
//! # Example
//!
//! ```no_run
//! use scriptorium::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;
mod subscription;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use subscription::SubscriptionConfig;

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SCRIPTORIUM";

/// Root application configuration
///
/// Every section has working defaults, so an empty environment yields a
/// development server on in-memory stores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection. Absent means in-memory stores.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Sessions and password hashing
    #[serde(default)]
    pub auth: AuthConfig,

    /// Webhook verification
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Ledger and reconciliation tuning
    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

impl AppConfig {
    /// Load configuration from `.env` and the process environment,
    /// e.g. `SCRIPTORIUM__SERVER__PORT=8080` -> `server.port`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Each section validates itself. Across sections, a reconciliation
    /// run must finish inside one request timeout.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate()?;
        self.payment.validate(&self.server.environment)?;
        self.subscription.validate()?;

        let poll_window = self.subscription.poll_window();
        if poll_window >= self.server.request_timeout() {
            return Err(ValidationError::PollWindowExceedsTimeout {
                poll_secs: poll_window.as_secs(),
                timeout_secs: self.server.request_timeout_secs,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SCRIPTORIUM__SERVER__PORT",
        "SCRIPTORIUM__SERVER__ENVIRONMENT",
        "SCRIPTORIUM__DATABASE__URL",
        "SCRIPTORIUM__PAYMENT__WEBHOOK_SECRET",
        "SCRIPTORIUM__SUBSCRIPTION__POLL_ATTEMPTS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_loads_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.database.is_none());
        assert!(config.payment.webhook_secret().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SCRIPTORIUM__SERVER__PORT", "9090");
        env::set_var("SCRIPTORIUM__DATABASE__URL", "postgres://localhost/scriptorium");
        env::set_var("SCRIPTORIUM__SUBSCRIPTION__POLL_ATTEMPTS", "10");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.database.map(|d| d.url).as_deref(),
            Some("postgres://localhost/scriptorium")
        );
        assert_eq!(config.subscription.poll_attempts, 10);
    }

    #[test]
    fn test_production_requires_webhook_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SCRIPTORIUM__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.server.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("PAYMENT__WEBHOOK_SECRET"))
        );
    }

    #[test]
    fn test_poll_window_must_fit_request_timeout() {
        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 30;
        config.subscription.poll_interval_ms = 1000;
        config.subscription.poll_attempts = 30;

        assert_eq!(
            config.validate(),
            Err(ValidationError::PollWindowExceedsTimeout {
                poll_secs: 30,
                timeout_secs: 30
            })
        );

        config.subscription.poll_attempts = 29;
        assert!(config.validate().is_ok());
    }
}
