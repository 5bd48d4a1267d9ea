//! Password verifier derivation using Argon2id.
//!
//! Stored verifiers are PHC strings (`$argon2id$v=19$...`) carrying their
//! own salt and cost parameters, so cost can be raised later without
//! invalidating existing users.

use std::fmt;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::{ExposeSecret, SecretString};

use super::AuthError;

/// A one-way password verifier in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps a PHC string loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// Derives and verifies password verifiers.
///
/// If a pepper is configured it is prepended to the password before
/// hashing; it must stay identical for the lifetime of stored hashes.
pub struct PasswordHasher {
    params: Params,
    pepper: Option<SecretString>,
    dummy: PasswordHash,
}

impl PasswordHasher {
    /// Creates a hasher with explicit Argon2id cost parameters.
    ///
    /// `memory_kib` is the memory cost, `iterations` the time cost.
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
        pepper: Option<SecretString>,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::internal(format!("invalid argon2 params: {e}")))?;

        let mut hasher = Self {
            params,
            pepper,
            dummy: PasswordHash::from_phc(String::new()),
        };
        // Verified against when the email is unknown, so both sign-in
        // failure paths pay the same derivation cost.
        hasher.dummy = hasher.hash("scriptorium-dummy-password")?;
        Ok(hasher)
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<PasswordHash, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let input = self.peppered(password);
        let phc = self
            .argon2()
            .hash_password(input.as_bytes(), &salt)
            .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?;
        Ok(PasswordHash(phc.to_string()))
    }

    /// Verifies a password against a stored verifier.
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only if the stored hash
    /// itself is malformed.
    pub fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
        let parsed = PhcString::new(hash.as_str())
            .map_err(|e| AuthError::internal(format!("invalid hash format: {e}")))?;
        let input = self.peppered(password);

        match self.argon2().verify_password(input.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::internal(format!("verify error: {e}"))),
        }
    }

    /// Burns one verification against the dummy hash. Result is discarded.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy);
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn peppered(&self, password: &str) -> String {
        match &self.pepper {
            Some(pepper) => format!("{}{}", pepper.expose_secret(), password),
            None => password.to_string(),
        }
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .field("peppered", &self.pepper.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher(pepper: Option<&str>) -> PasswordHasher {
        PasswordHasher::with_cost(
            256,
            1,
            1,
            pepper.map(|p| SecretString::new(p.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn correct_password_matches() {
        let hasher = fast_hasher(None);
        let hash = hasher.hash("hunter22").unwrap();
        assert!(hasher.verify("hunter22", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hasher = fast_hasher(None);
        let hash = hasher.hash("hunter22").unwrap();
        assert!(!hasher.verify("hunter23", &hash).unwrap());
    }

    #[test]
    fn hash_is_salted() {
        let hasher = fast_hasher(None);
        let a = hasher.hash("same-password").unwrap();
        let b = hasher.hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_argon2id_phc_and_never_plaintext() {
        let hasher = fast_hasher(None);
        let hash = hasher.hash("plaintext-secret").unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("plaintext-secret"));
    }

    #[test]
    fn pepper_is_applied() {
        let peppered = fast_hasher(Some("pepper!"));
        let plain = fast_hasher(None);
        let hash = peppered.hash("hunter22").unwrap();

        assert!(peppered.verify("hunter22", &hash).unwrap());
        assert!(!plain.verify("hunter22", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hasher = fast_hasher(None);
        let result = hasher.verify("x", &PasswordHash::from_phc("not-a-phc-string"));
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::from_phc("$argon2id$secret");
        assert_eq!(format!("{:?}", hash), "PasswordHash([REDACTED])");
    }

    #[test]
    fn invalid_cost_is_rejected() {
        assert!(PasswordHasher::with_cost(0, 0, 0, None).is_err());
    }
}
