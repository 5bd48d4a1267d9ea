//! Opaque session tokens.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of freshly issued tokens, in alphanumeric characters.
pub const TOKEN_LENGTH: usize = 64;

/// Opaque bearer credential. Carries no claims; meaning comes only from
/// the session row it keys.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a new random token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Wraps a token presented by a caller or loaded from storage.
    ///
    /// No format check: an unknown string simply matches no session.
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionToken({}…)", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_has_expected_length_and_alphabet() {
        let token = SessionToken::generate();
        assert_eq!(token.as_str().len(), TOKEN_LENGTH);
        assert!(token.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_tokens_differ() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn debug_shows_only_prefix() {
        let token = SessionToken::from_string("abcdefghijklmnop");
        assert_eq!(format!("{:?}", token), "SessionToken(abcdef…)");
    }
}
