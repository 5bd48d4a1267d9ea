//! Authentication configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Session and password-verifier settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// How long a session stays valid, in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Minimum password length at sign-up
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,

    /// Argon2 cost parameters, checked when the hasher is built
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Server-side secret prepended to passwords before hashing
    pub password_pepper: Option<SecretString>,
}

impl AuthConfig {
    /// Session lifetime as a chrono Duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=24 * 90).contains(&self.session_ttl_hours) {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if !(8..=128).contains(&self.password_min_length) {
            return Err(ValidationError::InvalidPasswordMinLength);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            password_min_length: default_password_min_length(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            password_pepper: None,
        }
    }
}

fn default_session_ttl_hours() -> i64 {
    168
}

fn default_password_min_length() -> usize {
    8
}

fn default_argon2_memory_kib() -> u32 {
    19 * 1024
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}
